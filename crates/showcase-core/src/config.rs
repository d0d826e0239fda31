use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub sections: SectionConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (theme preference lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Entrance animation settings for `.reveal` elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Visible fraction required before an element is revealed
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    /// Fraction of the viewport height cut off the bottom edge
    #[serde(default = "default_reveal_bottom_margin")]
    pub bottom_margin: f64,
    /// Delay added per ordinal position for elements without an explicit delay
    #[serde(default = "default_stagger_step")]
    pub stagger_step_ms: u32,
    /// Upper bound for computed delays
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            bottom_margin: default_reveal_bottom_margin(),
            stagger_step_ms: default_stagger_step(),
            max_delay_ms: default_max_delay(),
        }
    }
}

/// Active-section tracking for the navigation highlight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    #[serde(default = "default_section_threshold")]
    pub threshold: f64,
    /// Fraction of the viewport excluded from the top
    #[serde(default = "default_section_top_margin")]
    pub top_margin: f64,
    /// Fraction of the viewport excluded from the bottom
    #[serde(default = "default_section_bottom_margin")]
    pub bottom_margin: f64,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            threshold: default_section_threshold(),
            top_margin: default_section_top_margin(),
            bottom_margin: default_section_bottom_margin(),
        }
    }
}

/// "Now" widget rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_rotation_interval")]
    pub interval_ms: u64,
    /// Items shown by `showcase rotate` when none are given on the command line
    #[serde(default)]
    pub items: Vec<String>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_rotation_interval(),
            items: Vec::new(),
        }
    }
}

/// Easing curve for smooth anchor scrolling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    /// 1 - (1-t)^3
    #[default]
    Cubic,
    /// 1 - (1-t)^5
    Quintic,
    /// 1 - 2^(-10t)
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth anchor scrolling
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Animation duration in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate used when no frame callback source is available
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Scroll offset (px) past which the header gets `is-scrolled`
    #[serde(default = "default_scrolled_offset")]
    pub scrolled_offset: f64,
    /// Viewport width (px) above which the mobile menu is force-closed
    #[serde(default = "default_nav_breakpoint")]
    pub nav_breakpoint: f64,
    /// Height (px) of the sticky header, subtracted from anchor targets
    #[serde(default)]
    pub anchor_offset: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scrolled_offset: default_scrolled_offset(),
            nav_breakpoint: default_nav_breakpoint(),
            anchor_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Form action URL (e.g. a Formspree endpoint)
    #[serde(default)]
    pub action: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            action: None,
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("showcase")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_reveal_threshold() -> f64 {
    0.18
}

fn default_reveal_bottom_margin() -> f64 {
    0.10
}

fn default_stagger_step() -> u32 {
    80
}

fn default_max_delay() -> u32 {
    480
}

fn default_section_threshold() -> f64 {
    0.45
}

fn default_section_top_margin() -> f64 {
    0.32
}

fn default_section_bottom_margin() -> f64 {
    0.46
}

fn default_rotation_interval() -> u64 {
    5200
}

fn default_animation_duration() -> u64 {
    450
}

fn default_animation_fps() -> u32 {
    60
}

fn default_scrolled_offset() -> f64 {
    12.0
}

fn default_nav_breakpoint() -> f64 {
    960.0
}

fn default_timeout() -> u64 {
    30
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/showcase/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("showcase")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the theme preference file path
    pub fn theme_path(&self) -> PathBuf {
        self.data_dir().join("theme.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_constants() {
        let config = AppConfig::default();
        assert!((config.reveal.threshold - 0.18).abs() < f64::EPSILON);
        assert!((config.reveal.bottom_margin - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.reveal.stagger_step_ms, 80);
        assert_eq!(config.reveal.max_delay_ms, 480);
        assert!((config.sections.threshold - 0.45).abs() < f64::EPSILON);
        assert_eq!(config.rotation.interval_ms, 5200);
        assert_eq!(config.scroll.easing, EasingType::Cubic);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [rotation]
            interval_ms = 1000
            items = ["coffee", "rust"]

            [scroll]
            easing = "ease_out"
            "#,
        )
        .unwrap();

        assert_eq!(config.rotation.interval_ms, 1000);
        assert_eq!(config.rotation.items, vec!["coffee", "rust"]);
        assert_eq!(config.scroll.easing, EasingType::EaseOut);
        assert!(config.scroll.smooth_enabled);
        assert_eq!(config.reveal.max_delay_ms, 480);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AppConfig::from_toml("[reveal\nthreshold = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip_preserves_sections() {
        let mut config = AppConfig::default();
        config.header.anchor_offset = 72.0;
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert!((parsed.header.anchor_offset - 72.0).abs() < f64::EPSILON);
    }
}
