//! Gesture scripts
//!
//! A script is a TOML list of timed steps, each a stick movement or a
//! button tap:
//!
//! ```toml
//! [[step]]
//! at_ms = 0
//! joystick = { angle = 45.0, power = 80.0 }
//!
//! [[step]]
//! at_ms = 40
//! direction = 0
//!
//! [[step]]
//! at_ms = 60
//! button = "a"
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use touchpad_input::{Control, JoystickEvent, TouchEvent};

/// Raw polar stick position
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PolarInput {
    pub angle: f32,
    pub power: f32,
}

/// One timed step
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(default)]
    pub button: Option<Control>,
    #[serde(default)]
    pub joystick: Option<PolarInput>,
    #[serde(default)]
    pub direction: Option<i32>,
}

impl Step {
    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }

    /// Touch event for this step; polar input is resolved against `min_power`
    pub fn to_event(&self, min_power: f32) -> Result<TouchEvent> {
        match (self.button, self.joystick, self.direction) {
            (Some(control), None, None) => Ok(TouchEvent::Button(control)),
            (None, Some(polar), None) => Ok(TouchEvent::Joystick(JoystickEvent::from_polar(
                polar.angle,
                polar.power,
                min_power,
            ))),
            (None, None, Some(code)) => Ok(TouchEvent::Joystick(JoystickEvent::from_raw(
                0.0, 0.0, code,
            ))),
            _ => bail!(
                "step at {} ms must set exactly one of button, joystick or direction",
                self.at_ms
            ),
        }
    }
}

/// A parsed gesture script
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Parse a script, ordering steps by time
    pub fn parse(contents: &str) -> Result<Self> {
        let mut script: Script = toml::from_str(contents)?;
        // Stable sort keeps file order for steps at the same time
        script.steps.sort_by_key(|step| step.at_ms);
        Ok(script)
    }

    /// Resolve every step up front so a bad step fails before replay starts
    pub fn events(&self, min_power: f32) -> Result<Vec<(Duration, TouchEvent)>> {
        self.steps
            .iter()
            .map(|step| Ok((step.offset(), step.to_event(min_power)?)))
            .collect()
    }
}
