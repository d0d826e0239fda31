//! Light/dark theme with persisted preference
//!
//! An explicit choice is stored under `theme-preference`; without one the
//! page follows the system color scheme. Storage that cannot be read or
//! written is treated as empty.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

pub const STORAGE_KEY: &str = "theme-preference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::Other(format!("Unknown theme: {}", other))),
        }
    }
}

/// Key-value persistence for the theme choice
pub trait ThemeStore {
    fn load(&self) -> Result<Option<Theme>>;
    fn save(&mut self, theme: Theme) -> Result<()>;
}

/// JSON file holding `{"theme-preference": "dark"}`
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let entries: BTreeMap<String, String> = serde_json::from_str(&content)?;
        entries
            .get(STORAGE_KEY)
            .map(|value| value.parse::<Theme>())
            .transpose()
            .map_err(|e| Error::Storage(e.to_string()))
    }

    fn save(&mut self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut entries = BTreeMap::new();
        entries.insert(STORAGE_KEY.to_string(), theme.as_str().to_string());
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct ThemeController<S: ThemeStore> {
    store: S,
    theme: Theme,
}

impl<S: ThemeStore> ThemeController<S> {
    /// Stored preference, else the system color scheme
    pub fn new(store: S, system_prefers_dark: bool) -> Self {
        let theme = stored_theme(&store).unwrap_or_else(|| Theme::from_system(system_prefers_dark));
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Value for the toggle's `aria-pressed`
    pub fn aria_pressed(&self) -> &'static str {
        if self.theme == Theme::Dark {
            "true"
        } else {
            "false"
        }
    }

    pub fn has_stored_preference(&self) -> bool {
        stored_theme(&self.store).is_some()
    }

    /// Flip and persist the theme
    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.store.save(theme) {
            debug!(error = %e, "Theme preference not saved");
        }
    }

    /// Follow the system scheme unless the user chose explicitly
    ///
    /// Returns whether the theme was applied.
    pub fn on_system_change(&mut self, prefers_dark: bool) -> bool {
        if self.has_stored_preference() {
            return false;
        }
        self.theme = Theme::from_system(prefers_dark);
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn stored_theme<S: ThemeStore>(store: &S) -> Option<Theme> {
    match store.load() {
        Ok(theme) => theme,
        Err(e) => {
            debug!(error = %e, "Theme preference unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        value: Option<Theme>,
        saves: usize,
    }

    impl ThemeStore for MemoryStore {
        fn load(&self) -> Result<Option<Theme>> {
            Ok(self.value)
        }

        fn save(&mut self, theme: Theme) -> Result<()> {
            self.value = Some(theme);
            self.saves += 1;
            Ok(())
        }
    }

    struct BrokenStore;

    impl ThemeStore for BrokenStore {
        fn load(&self) -> Result<Option<Theme>> {
            Err(Error::Storage("blocked".into()))
        }

        fn save(&mut self, _theme: Theme) -> Result<()> {
            Err(Error::Storage("blocked".into()))
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("showcase-theme-{}-{}", std::process::id(), name))
            .join("theme.json")
    }

    #[test]
    fn test_initial_theme_prefers_stored() {
        let store = MemoryStore {
            value: Some(Theme::Light),
            saves: 0,
        };
        assert_eq!(ThemeController::new(store, true).theme(), Theme::Light);
        assert_eq!(ThemeController::new(MemoryStore::default(), true).theme(), Theme::Dark);
        assert_eq!(ThemeController::new(MemoryStore::default(), false).theme(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let mut controller = ThemeController::new(MemoryStore::default(), false);
        assert_eq!(controller.toggle(), Theme::Dark);
        assert_eq!(controller.aria_pressed(), "true");
        assert_eq!(controller.store().value, Some(Theme::Dark));
        assert_eq!(controller.store().saves, 1);
    }

    #[test]
    fn test_system_change_ignored_with_stored_choice() {
        let mut controller = ThemeController::new(MemoryStore::default(), false);
        assert!(controller.on_system_change(true));
        assert_eq!(controller.theme(), Theme::Dark);

        controller.set(Theme::Light);
        assert!(!controller.on_system_change(true));
        assert_eq!(controller.theme(), Theme::Light);
    }

    #[test]
    fn test_broken_storage_falls_back() {
        let mut controller = ThemeController::new(BrokenStore, true);
        assert_eq!(controller.theme(), Theme::Dark);
        assert_eq!(controller.toggle(), Theme::Light);
        assert!(controller.on_system_change(true));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let path = temp_path("roundtrip");
        let mut store = FileThemeStore::new(&path);
        assert_eq!(store.load().unwrap(), None);

        store.save(Theme::Dark).unwrap();
        assert_eq!(FileThemeStore::new(&path).load().unwrap(), Some(Theme::Dark));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(STORAGE_KEY));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_corrupt_is_error() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileThemeStore::new(&path);
        assert!(matches!(store.load(), Err(Error::Json(_))));
        assert_eq!(ThemeController::new(store, false).theme(), Theme::Light);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(" Dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
