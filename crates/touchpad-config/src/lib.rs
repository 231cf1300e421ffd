//! Configuration management for the touchpad input layer
//!
//! Key bindings and control timings live in one TOML file:
//!
//! ```toml
//! [keymap]
//! right = "D"
//! up = "W"
//! a = "J"
//! select = "RShift"
//!
//! [controls]
//! release_delay_ms = 10
//! min_power = 10.0
//! release_policy = "overlapping"
//! ```

mod controls;

pub use controls::ControlsConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use touchpad_input::{Cardinal, Control, KeyCode, KeyMap};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Input error: {0}")]
    Input(#[from] touchpad_input::InputError),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/touchpad";
pub const CONFIG_FILE: &str = "config.toml";

/// Main touchpad configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchpadConfig {
    #[serde(default)]
    pub keymap: KeyMap,

    #[serde(default)]
    pub controls: ControlsConfig,
}

impl TouchpadConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        tracing::info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // Try user config first, then system config
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            return Self::load(&user_config);
        }

        let system_config = Path::new(CONFIG_DIR).join(CONFIG_FILE);
        if system_config.exists() {
            return Self::load(&system_config);
        }

        // Return default config if no file exists
        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Rebind one stick direction or button by name, e.g. `("a", "L")`
    pub fn set_binding(&mut self, binding: &str, key_name: &str) -> Result<(), ConfigError> {
        let key = KeyCode::from_name(key_name)?;
        let slot = match binding.trim().to_ascii_lowercase().as_str() {
            "right" => &mut self.keymap.right,
            "up" => &mut self.keymap.up,
            "left" => &mut self.keymap.left,
            "down" => &mut self.keymap.down,
            other => {
                let control: Control = other.parse()?;
                match control {
                    Control::Start => &mut self.keymap.start,
                    Control::Select => &mut self.keymap.select,
                    Control::A => &mut self.keymap.a,
                    Control::B => &mut self.keymap.b,
                }
            }
        };
        *slot = key;
        Ok(())
    }

    /// Check the configuration can drive the input layer
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cardinals = [Cardinal::Right, Cardinal::Up, Cardinal::Left, Cardinal::Down];
        let mut seen = HashSet::new();
        for cardinal in cardinals {
            let key = self.keymap.cardinal(cardinal);
            if !seen.insert(key) {
                return Err(ConfigError::Invalid(format!(
                    "stick direction {:?} reuses key {}",
                    cardinal, key
                )));
            }
        }

        // A button release would lift a key the stick is still holding
        for &control in Control::all() {
            let key = self.keymap.control(control);
            if seen.contains(&key) {
                return Err(ConfigError::Invalid(format!(
                    "button {} reuses stick key {}",
                    control, key
                )));
            }
        }

        if self.controls.release_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "release_delay_ms must be greater than zero".to_string(),
            ));
        }

        let min_power = self.controls.min_power;
        if min_power.is_nan() || min_power < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_power must be a non-negative number, got {}",
                min_power
            )));
        }

        Ok(())
    }
}

/// Per-user configuration file (`$XDG_CONFIG_HOME/touchpad` or `~/.config/touchpad`)
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("touchpad").join(CONFIG_FILE))
}
