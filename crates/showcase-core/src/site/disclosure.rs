//! Project modals and collapsible testimonials

use std::collections::BTreeSet;

/// Project detail dialogs, at most one open at a time
#[derive(Debug, Clone, Default)]
pub struct ModalSet {
    known: BTreeSet<String>,
    open: Option<String>,
}

impl ModalSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: ids.into_iter().map(Into::into).collect(),
            open: None,
        }
    }

    /// Open a modal by id; unknown ids are ignored
    pub fn open(&mut self, id: &str) -> bool {
        if !self.known.contains(id) {
            return false;
        }
        self.open = Some(id.to_string());
        true
    }

    pub fn close(&mut self, id: &str) {
        if self.open.as_deref() == Some(id) {
            self.open = None;
        }
    }

    /// Click on the dimmed backdrop or a `data-close` control
    pub fn on_backdrop_click(&mut self) {
        self.open = None;
    }

    pub fn on_key(&mut self, key: &str) {
        if key == "Escape" {
            self.open = None;
        }
    }

    pub fn open_id(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.as_deref() == Some(id)
    }
}

/// "Read more" toggle on a long testimonial
#[derive(Debug, Clone, Default)]
pub struct Disclosure {
    expanded: bool,
}

impl Disclosure {
    pub const EXPAND_LABEL: &'static str = "Читать полностью";
    pub const COLLAPSE_LABEL: &'static str = "Свернуть";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn label(&self) -> &'static str {
        if self.expanded {
            Self::COLLAPSE_LABEL
        } else {
            Self::EXPAND_LABEL
        }
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.expanded {
            "true"
        } else {
            "false"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_open_close() {
        let mut modals = ModalSet::new(["atlas", "orbit"]);
        assert!(!modals.open("missing"));
        assert_eq!(modals.open_id(), None);

        assert!(modals.open("atlas"));
        assert!(modals.open("orbit"));
        assert_eq!(modals.open_id(), Some("orbit"));

        modals.close("atlas");
        assert!(modals.is_open("orbit"));
        modals.on_key("Escape");
        assert_eq!(modals.open_id(), None);

        modals.open("atlas");
        modals.on_backdrop_click();
        assert_eq!(modals.open_id(), None);
    }

    #[test]
    fn test_disclosure_labels() {
        let mut quote = Disclosure::new();
        assert_eq!(quote.label(), "Читать полностью");
        assert_eq!(quote.aria_expanded(), "false");
        assert!(quote.toggle());
        assert_eq!(quote.label(), "Свернуть");
        assert_eq!(quote.aria_expanded(), "true");
        assert!(!quote.toggle());
    }
}
