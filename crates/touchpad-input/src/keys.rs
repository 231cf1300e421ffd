//! Key codes, logical controls and the key map
//!
//! Key codes follow the host keyboard numbering (Android `KEYCODE_*` values),
//! which is what the emulation core's key interface understands.

use crate::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A virtual key understood by the emulation core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCode(pub u16);

/// Canonical names, in code order within each group
const NAMED_KEYS: &[(&str, u16)] = &[
    ("Digit0", 7),
    ("Digit1", 8),
    ("Digit2", 9),
    ("Digit3", 10),
    ("Digit4", 11),
    ("Digit5", 12),
    ("Digit6", 13),
    ("Digit7", 14),
    ("Digit8", 15),
    ("Digit9", 16),
    ("DpadUp", 19),
    ("DpadDown", 20),
    ("DpadLeft", 21),
    ("DpadRight", 22),
    ("A", 29),
    ("B", 30),
    ("C", 31),
    ("D", 32),
    ("E", 33),
    ("F", 34),
    ("G", 35),
    ("H", 36),
    ("I", 37),
    ("J", 38),
    ("K", 39),
    ("L", 40),
    ("M", 41),
    ("N", 42),
    ("O", 43),
    ("P", 44),
    ("Q", 45),
    ("R", 46),
    ("S", 47),
    ("T", 48),
    ("U", 49),
    ("V", 50),
    ("W", 51),
    ("X", 52),
    ("Y", 53),
    ("Z", 54),
    ("AltLeft", 57),
    ("AltRight", 58),
    ("ShiftLeft", 59),
    ("ShiftRight", 60),
    ("Tab", 61),
    ("Space", 62),
    ("Enter", 66),
    ("Escape", 111),
    ("CtrlLeft", 113),
    ("CtrlRight", 114),
];

/// Alternative spellings accepted when parsing key bindings
const KEY_ALIASES: &[(&str, &str)] = &[
    ("Return", "Enter"),
    ("LShift", "ShiftLeft"),
    ("RShift", "ShiftRight"),
    ("LControl", "CtrlLeft"),
    ("RControl", "CtrlRight"),
    ("LAlt", "AltLeft"),
    ("RAlt", "AltRight"),
    ("Up", "DpadUp"),
    ("Down", "DpadDown"),
    ("Left", "DpadLeft"),
    ("Right", "DpadRight"),
    ("Num0", "Digit0"),
    ("Num1", "Digit1"),
    ("Num2", "Digit2"),
    ("Num3", "Digit3"),
    ("Num4", "Digit4"),
    ("Num5", "Digit5"),
    ("Num6", "Digit6"),
    ("Num7", "Digit7"),
    ("Num8", "Digit8"),
    ("Num9", "Digit9"),
];

impl KeyCode {
    pub const A: KeyCode = KeyCode(29);
    pub const D: KeyCode = KeyCode(32);
    pub const J: KeyCode = KeyCode(38);
    pub const K: KeyCode = KeyCode(39);
    pub const S: KeyCode = KeyCode(47);
    pub const W: KeyCode = KeyCode(51);
    pub const SHIFT_RIGHT: KeyCode = KeyCode(60);
    pub const ENTER: KeyCode = KeyCode(66);

    /// Look up a key by name (case-insensitive), alias or raw decimal code
    pub fn from_name(name: &str) -> Result<Self, InputError> {
        let name = name.trim();

        if let Some(&(_, code)) = NAMED_KEYS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
        {
            return Ok(KeyCode(code));
        }

        if let Some(&(_, canonical)) = KEY_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        {
            return Self::from_name(canonical);
        }

        name.parse::<u16>()
            .map(KeyCode)
            .map_err(|_| InputError::UnknownKey(name.to_string()))
    }

    /// Canonical name, if this code has one
    pub fn name(&self) -> Option<&'static str> {
        NAMED_KEYS
            .iter()
            .find(|(_, code)| *code == self.0)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for KeyCode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for KeyCode {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<KeyCode> for String {
    fn from(key: KeyCode) -> Self {
        key.to_string()
    }
}

/// The four stick directions a diagonal decomposes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    Right,
    Up,
    Left,
    Down,
}

/// Fixed on-screen buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Start,
    Select,
    A,
    B,
}

impl Control {
    /// Get all on-screen buttons
    pub fn all() -> &'static [Control] {
        &[Control::Start, Control::Select, Control::A, Control::B]
    }

    /// Get control name
    pub fn name(&self) -> &'static str {
        match self {
            Control::Start => "start",
            Control::Select => "select",
            Control::A => "a",
            Control::B => "b",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Control {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Control::all()
            .iter()
            .copied()
            .find(|control| control.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::UnknownControl(s.to_string()))
    }
}

/// Which key each stick direction and button produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub right: KeyCode,
    pub up: KeyCode,
    pub left: KeyCode,
    pub down: KeyCode,
    pub start: KeyCode,
    pub select: KeyCode,
    pub a: KeyCode,
    pub b: KeyCode,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            right: KeyCode::D,
            up: KeyCode::W,
            left: KeyCode::A,
            down: KeyCode::S,
            start: KeyCode::ENTER,
            select: KeyCode::SHIFT_RIGHT,
            a: KeyCode::J,
            b: KeyCode::K,
        }
    }
}

impl KeyMap {
    pub fn cardinal(&self, cardinal: Cardinal) -> KeyCode {
        match cardinal {
            Cardinal::Right => self.right,
            Cardinal::Up => self.up,
            Cardinal::Left => self.left,
            Cardinal::Down => self.down,
        }
    }

    pub fn control(&self, control: Control) -> KeyCode {
        match control {
            Control::Start => self.start,
            Control::Select => self.select,
            Control::A => self.a,
            Control::B => self.b,
        }
    }

    /// Build the binding for a button with the given release delay
    pub fn binding(&self, control: Control, delay: Duration) -> ButtonBinding {
        ButtonBinding {
            control,
            key: self.control(control),
            delay,
        }
    }
}

/// A button's key and how long after the press its release fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    pub control: Control,
    pub key: KeyCode,
    pub delay: Duration,
}
