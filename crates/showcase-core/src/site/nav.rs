//! Responsive navigation menu
//!
//! The sticky header's scrolled state belongs to the motion coordinator.

use crate::config::HeaderConfig;

#[derive(Debug, Clone)]
pub struct NavMenu {
    /// Toggle button and menu both exist on the page
    has_controls: bool,
    open: bool,
    breakpoint: f64,
}

impl NavMenu {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            has_controls: true,
            open: false,
            breakpoint: config.nav_breakpoint,
        }
    }

    /// Page without a menu toggle; toggling does nothing
    pub fn without_controls(config: &HeaderConfig) -> Self {
        Self {
            has_controls: false,
            ..Self::new(config)
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Value for the toggle's `aria-expanded`
    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    /// Returns the new open state
    pub fn toggle(&mut self) -> bool {
        if self.has_controls {
            self.open = !self.open;
        }
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn on_key(&mut self, key: &str) {
        if key == "Escape" {
            self.close();
        }
    }

    /// Wide viewports show the full menu, so the mobile overlay closes
    pub fn on_resize(&mut self, width: f64) {
        if width > self.breakpoint {
            self.close();
        }
    }

    pub fn on_link_click(&mut self) {
        self.close();
    }

    pub fn on_backdrop_click(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_close_paths() {
        let mut nav = NavMenu::new(&HeaderConfig::default());
        assert_eq!(nav.aria_expanded(), "false");

        assert!(nav.toggle());
        assert_eq!(nav.aria_expanded(), "true");
        nav.on_key("Enter");
        assert!(nav.is_open());
        nav.on_key("Escape");
        assert!(!nav.is_open());

        nav.toggle();
        nav.on_resize(800.0);
        assert!(nav.is_open());
        nav.on_resize(1200.0);
        assert!(!nav.is_open());

        nav.toggle();
        nav.on_link_click();
        assert!(!nav.is_open());

        nav.toggle();
        nav.on_backdrop_click();
        assert!(!nav.is_open());
    }

    #[test]
    fn test_missing_controls_noop() {
        let mut nav = NavMenu::without_controls(&HeaderConfig::default());
        assert!(!nav.toggle());
        assert!(!nav.is_open());
    }
}
