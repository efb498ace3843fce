//! Input routing configuration
//!
//! Supports multiple profiles (debug, release) with different settings.
//! Every tuning constant of the pointer state machine lives here so that
//! hosts can adjust timing without touching the engine.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The underlying config sources could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    /// A value was read but is outside the range the engine can work with
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tuning constants for the pointer state machine
///
/// All timing values are measured in simulation ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Offset change per activation of a scrollbar arrow button
    pub scroll_button_step: i32,
    /// Thickness of a scrollbar in pixels
    pub scrollbar_thickness: i32,
    /// Secondary-button gestures that panned less than this are treated as clicks
    pub pan_click_threshold: u32,
    /// Press duration before a repeatable button starts auto-repeating
    pub repeat_initial_delay: u32,
    /// Ticks between two auto-repeat invocations
    pub repeat_period: u32,
    /// A tooltip re-hovered within this many ticks of closing opens immediately
    pub tooltip_rehover_window: u32,
    /// Stationary hover time before a tooltip opens
    pub tooltip_delay: u32,
    /// Tooltips close on their own after this much continued hover
    pub tooltip_timeout: u32,
    /// Pointer movement (per axis) still counted as stationary
    pub tooltip_stationary_tolerance: i32,
    /// Size of the bottom-right corner that starts a window resize
    pub resize_corner_size: i32,
    /// Distance from the bottom screen edge that drags and resizes keep clear of
    pub screen_edge_margin: i32,
    /// Pan the viewport in the direction opposite to the pointer
    pub invert_viewport_drag: bool,
    /// Scroll the main viewport while the cursor touches a screen edge
    pub edge_scrolling: bool,
    /// Edge scrolling distance per frame at zoom level 0
    pub edge_scroll_step: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            scroll_button_step: 3,
            scrollbar_thickness: 11,
            pan_click_threshold: 500,
            repeat_initial_delay: 16,
            repeat_period: 4,
            tooltip_rehover_window: 1000,
            tooltip_delay: 2000,
            tooltip_timeout: 8000,
            tooltip_stationary_tolerance: 0,
            resize_corner_size: 19,
            screen_edge_margin: 2,
            invert_viewport_drag: false,
            edge_scrolling: false,
            edge_scroll_step: 12,
        }
    }
}

impl InputConfig {
    /// Checks that the values can drive the state machine
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.repeat_period == 0 {
            return Err(SettingsError::Invalid {
                field: "repeat_period",
                reason: "must be at least one tick",
            });
        }
        if self.scrollbar_thickness <= 0 {
            return Err(SettingsError::Invalid {
                field: "scrollbar_thickness",
                reason: "must be positive",
            });
        }
        if self.tooltip_timeout == 0 {
            return Err(SettingsError::Invalid {
                field: "tooltip_timeout",
                reason: "must be at least one tick",
            });
        }
        if self.scroll_button_step < 0 || self.edge_scroll_step < 0 {
            return Err(SettingsError::Invalid {
                field: "scroll_button_step",
                reason: "scroll steps cannot be negative",
            });
        }
        Ok(())
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Pointer input tuning
    #[serde(default)]
    pub input: InputConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{profile}.toml (profile-specific overrides)
    /// 3. Environment variables with prefix APP_ (e.g., APP_INPUT__REPEAT_PERIOD=2)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, SettingsError> {
        match Self::find_config_dir() {
            Some(dir) => Self::load_from_dir(&dir, profile),
            None => Self::build(
                Config::builder()
                    .add_source(File::with_name("config/default").required(false))
                    .add_source(File::with_name(&format!("config/{}", profile)).required(false)),
                profile,
            ),
        }
    }

    /// Loads a profile from an explicit config directory, layered over its `default` file
    pub fn load_from_dir(dir: &Path, profile: &str) -> Result<Self, SettingsError> {
        let default_path = dir.join("default");
        let profile_path = dir.join(profile);
        Self::build(
            Config::builder()
                .add_source(File::from(default_path.as_path()).required(false))
                .add_source(File::from(profile_path.as_path()).required(false)),
            profile,
        )
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        profile: &str,
    ) -> Result<Self, SettingsError> {
        // Use __ as separator for nested fields (e.g., APP_INPUT__TOOLTIP_DELAY)
        let config = builder
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("profile", profile)?
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.input.validate()?;
        Ok(loaded)
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, SettingsError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self {
            profile: "release".to_string(),
            input: InputConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_match_reference_tuning() {
        let config = InputConfig::default();
        assert_eq!(config.scroll_button_step, 3);
        assert_eq!(config.pan_click_threshold, 500);
        assert_eq!(config.repeat_initial_delay, 16);
        assert_eq!(config.repeat_period, 4);
        assert_eq!(config.tooltip_rehover_window, 1000);
        assert_eq!(config.tooltip_delay, 2000);
        assert_eq!(config.tooltip_timeout, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_repeat_period_is_rejected() {
        let config = InputConfig {
            repeat_period: 0,
            ..InputConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "repeat_period",
                ..
            }
        ));
    }

    #[test]
    fn test_load_profile_from_dir_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("custom.toml"),
            "[input]\nrepeat_period = 2\ntooltip_delay = 100\n",
        )
        .unwrap();

        let config = AppConfig::load_from_dir(dir.path(), "custom").unwrap();
        assert_eq!(config.profile, "custom");
        assert_eq!(config.input.repeat_period, 2);
        assert_eq!(config.input.tooltip_delay, 100);
        // Untouched keys keep their defaults
        assert_eq!(config.input.pan_click_threshold, 500);
    }

    #[test]
    fn test_profile_layers_over_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[input]\nrepeat_period = 2\nedge_scroll_step = 20\n",
        )
        .unwrap();
        fs::write(dir.path().join("debug.toml"), "[input]\nedge_scroll_step = 6\n").unwrap();

        let debug = AppConfig::load_from_dir(dir.path(), "debug").unwrap();
        assert_eq!(debug.input.repeat_period, 2);
        assert_eq!(debug.input.edge_scroll_step, 6);

        // A profile without its own file still picks up the base layer
        let other = AppConfig::load_from_dir(dir.path(), "other").unwrap();
        assert_eq!(other.input.repeat_period, 2);
        assert_eq!(other.input.edge_scroll_step, 20);
    }

    #[test]
    fn test_missing_profile_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_dir(dir.path(), "absent").unwrap();
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn test_invalid_file_value_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.toml"), "[input]\nrepeat_period = 0\n").unwrap();

        let result = AppConfig::load_from_dir(dir.path(), "broken");
        assert!(matches!(result, Err(SettingsError::Invalid { .. })));
    }
}
