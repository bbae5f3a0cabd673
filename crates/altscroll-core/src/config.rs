use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::scroll::EasingType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
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

/// Engine behaviour. Fixed once an engine is built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Align to the nearest child after drags and scroll activity
    #[serde(default)]
    pub snap: bool,
    /// Default snap animation length in milliseconds
    #[serde(default = "default_snap_speed")]
    pub snap_speed_ms: u64,
    /// Reserved. Parsed and carried, not read by any transition.
    #[serde(default)]
    pub scroll_lock: bool,
    /// Reserved companion of `scroll_lock`
    #[serde(default = "default_scroll_lock_threshold")]
    pub scroll_lock_threshold_px: u32,
    /// Keep moving after a drag is released
    #[serde(default = "default_true")]
    pub momentum: bool,
    /// Momentum deceleration in offset units per ms²
    #[serde(default = "default_momentum_falloff")]
    pub momentum_falloff: f64,
    /// Re-measure geometry after the host reports a resize
    #[serde(default = "default_true")]
    pub dynamic_resize: bool,
    /// Quiet period before a resize triggers a geometry refresh
    #[serde(default = "default_debounce")]
    pub resize_debounce_ms: u64,
    /// Quiet period of scroll activity before an idle snap
    #[serde(default = "default_debounce")]
    pub snap_idle_ms: u64,
    /// Easing for momentum and snap animations
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            snap: false,
            snap_speed_ms: default_snap_speed(),
            scroll_lock: false,
            scroll_lock_threshold_px: default_scroll_lock_threshold(),
            momentum: default_true(),
            momentum_falloff: default_momentum_falloff(),
            dynamic_resize: default_true(),
            resize_debounce_ms: default_debounce(),
            snap_idle_ms: default_debounce(),
            easing: EasingType::default(),
        }
    }
}

impl ScrollConfig {
    /// Reject values that would make the momentum math or timers degenerate
    pub fn validate(&self) -> crate::Result<()> {
        if !self.momentum_falloff.is_finite() || self.momentum_falloff <= 0.0 {
            return Err(crate::Error::Config(format!(
                "momentum_falloff must be a positive number, got {}",
                self.momentum_falloff
            )));
        }
        if self.resize_debounce_ms == 0 {
            return Err(crate::Error::Config(
                "resize_debounce_ms must be greater than zero".to_string(),
            ));
        }
        if self.snap_idle_ms == 0 {
            return Err(crate::Error::Config(
                "snap_idle_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn snap_speed(&self) -> f64 {
        self.snap_speed_ms as f64
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn snap_idle(&self) -> Duration {
        Duration::from_millis(self.snap_idle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while an animation or timer is pending
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Number of cards in the demo carousel
    #[serde(default = "default_cards")]
    pub cards: usize,
    /// Card width in terminal columns
    #[serde(default = "default_card_width")]
    pub card_width: u16,
    /// Gap between cards in terminal columns
    #[serde(default = "default_card_gap")]
    pub card_gap: u16,
    /// Width of the native scrollbar the container hides, in the surface's units
    #[serde(default)]
    pub scrollbar_inset: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            cards: default_cards(),
            card_width: default_card_width(),
            card_gap: default_card_gap(),
            scrollbar_inset: 0.0,
        }
    }
}

impl UiConfig {
    /// Tick duration while animating
    pub fn frame_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis((1000 / self.animation_fps as u64).max(1))
        }
    }

    /// Reject values that would stall or flood the frame loop
    pub fn validate(&self) -> crate::Result<()> {
        if self.animation_fps > MAX_ANIMATION_FPS {
            return Err(crate::Error::Config(format!(
                "animation_fps must be at most {}, got {}",
                MAX_ANIMATION_FPS, self.animation_fps
            )));
        }
        if self.tick_rate_ms == 0 {
            return Err(crate::Error::Config(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        if self.card_width == 0 {
            return Err(crate::Error::Config(
                "card_width must be greater than zero".to_string(),
            ));
        }
        if !self.scrollbar_inset.is_finite() {
            return Err(crate::Error::Config(format!(
                "scrollbar_inset must be a finite number, got {}",
                self.scrollbar_inset
            )));
        }
        Ok(())
    }
}

/// One frame per millisecond
const MAX_ANIMATION_FPS: u32 = 1000;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("altscroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_snap_speed() -> u64 {
    300
}

fn default_scroll_lock_threshold() -> u32 {
    20
}

fn default_momentum_falloff() -> f64 {
    0.006
}

fn default_debounce() -> u64 {
    500
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_cards() -> usize {
    8
}

fn default_card_width() -> u16 {
    24
}

fn default_card_gap() -> u16 {
    2
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
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> crate::Result<()> {
        self.scroll.validate()?;
        self.ui.validate()
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/altscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("altscroll")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("altscroll.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scroll_config() {
        let config = ScrollConfig::default();
        assert!(!config.snap);
        assert_eq!(config.snap_speed_ms, 300);
        assert!(!config.scroll_lock);
        assert_eq!(config.scroll_lock_threshold_px, 20);
        assert!(config.momentum);
        assert!((config.momentum_falloff - 0.006).abs() < f64::EPSILON);
        assert!(config.dynamic_resize);
        assert_eq!(config.resize_debounce(), Duration::from_millis(500));
        assert_eq!(config.snap_idle(), Duration::from_millis(500));
        assert_eq!(config.easing, EasingType::Cubic);
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scroll]
            snap = true
            snap_speed_ms = 450
            easing = "quintic"
            "#,
        )
        .unwrap();

        assert!(config.scroll.snap);
        assert_eq!(config.scroll.snap_speed_ms, 450);
        assert_eq!(config.scroll.easing, EasingType::Quintic);
        assert!(config.scroll.momentum);
        assert_eq!(config.ui.card_width, 24);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_falloff() {
        for falloff in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let config = ScrollConfig {
                momentum_falloff: falloff,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "falloff {falloff} accepted");
        }
        assert!(ScrollConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_debounce() {
        let config = ScrollConfig {
            snap_idle_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("altscroll-definitely-missing.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.scroll, ScrollConfig::default());
    }

    #[test]
    fn test_toml_roundtrip_keeps_reserved_options() {
        let mut config = AppConfig::default();
        config.scroll.scroll_lock = true;
        config.scroll.scroll_lock_threshold_px = 35;
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert!(parsed.scroll.scroll_lock);
        assert_eq!(parsed.scroll.scroll_lock_threshold_px, 35);
    }

    #[test]
    fn test_frame_duration_fallback() {
        let ui = UiConfig {
            animation_fps: 0,
            ..Default::default()
        };
        assert_eq!(ui.frame_duration(), Duration::from_millis(16));
        assert_eq!(UiConfig::default().frame_duration(), Duration::from_millis(16));
    }

    #[test]
    fn test_frame_duration_never_zero() {
        let ui = UiConfig {
            animation_fps: 1000,
            ..Default::default()
        };
        assert_eq!(ui.frame_duration(), Duration::from_millis(1));
        let ui = UiConfig {
            animation_fps: u32::MAX,
            ..Default::default()
        };
        assert_eq!(ui.frame_duration(), Duration::from_millis(1));
    }

    #[test]
    fn test_ui_validation() {
        let config: AppConfig = toml::from_str("[ui]\nanimation_fps = 2000").unwrap();
        assert!(config.scroll.validate().is_ok());
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        let config: AppConfig = toml::from_str("[ui]\ntick_rate_ms = 0").unwrap();
        assert!(config.validate().is_err());

        let config: AppConfig = toml::from_str("[ui]\ncard_width = 0").unwrap();
        assert!(config.validate().is_err());

        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_rejects_invalid_ui() {
        let path = std::env::temp_dir().join(format!("altscroll-ui-{}.toml", std::process::id()));
        std::fs::write(&path, "[ui]\nanimation_fps = 5000\n").unwrap();

        let result = AppConfig::load_from(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
