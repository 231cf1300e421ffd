//! Control timing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use touchpad_input::{ButtonSettings, DEFAULT_MIN_POWER, ReleasePolicy};

/// Timings and thresholds of the on-screen controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Delay between a button's key-down and key-up, in milliseconds
    #[serde(default = "default_release_delay_ms")]
    pub release_delay_ms: u64,

    /// Joystick power below which the stick reports neutral
    #[serde(default = "default_min_power")]
    pub min_power: f32,

    /// What a press does to a release still pending for the same button
    #[serde(default)]
    pub release_policy: ReleasePolicy,
}

fn default_release_delay_ms() -> u64 {
    10
}

fn default_min_power() -> f32 {
    DEFAULT_MIN_POWER
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            release_delay_ms: default_release_delay_ms(),
            min_power: default_min_power(),
            release_policy: ReleasePolicy::default(),
        }
    }
}

impl ControlsConfig {
    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }

    /// Button settings for a touch controller
    pub fn button_settings(&self) -> ButtonSettings {
        ButtonSettings {
            release_delay: self.release_delay(),
            policy: self.release_policy,
        }
    }
}
