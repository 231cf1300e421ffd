//! Joystick direction codes and their key decomposition

use crate::InputError;
use crate::keys::{Cardinal, KeyCode, KeyMap};
use std::fmt;

/// Discretized joystick direction
///
/// Codes run 0..=8: 0 is neutral and 1..=8 are the octants starting at
/// right and moving through up, left and down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Neutral,
    Right,
    RightUp,
    Up,
    LeftUp,
    Left,
    LeftDown,
    Down,
    RightDown,
}

impl Direction {
    /// Get all directions in code order
    pub fn all() -> &'static [Direction] {
        &[
            Direction::Neutral,
            Direction::Right,
            Direction::RightUp,
            Direction::Up,
            Direction::LeftUp,
            Direction::Left,
            Direction::LeftDown,
            Direction::Down,
            Direction::RightDown,
        ]
    }

    /// Numeric direction code
    pub fn code(&self) -> u8 {
        match self {
            Direction::Neutral => 0,
            Direction::Right => 1,
            Direction::RightUp => 2,
            Direction::Up => 3,
            Direction::LeftUp => 4,
            Direction::Left => 5,
            Direction::LeftDown => 6,
            Direction::Down => 7,
            Direction::RightDown => 8,
        }
    }

    /// Lenient conversion: codes outside 0..=8 are treated as neutral
    pub fn from_code(code: i32) -> Self {
        Self::try_from(code).unwrap_or_else(|err| {
            tracing::warn!("{}, treating as neutral", err);
            Direction::Neutral
        })
    }

    /// Stick directions pressed for this direction, in emission order
    pub fn cardinals(&self) -> &'static [Cardinal] {
        match self {
            Direction::Neutral => &[],
            Direction::Right => &[Cardinal::Right],
            Direction::RightUp => &[Cardinal::Right, Cardinal::Up],
            Direction::Up => &[Cardinal::Up],
            Direction::LeftUp => &[Cardinal::Up, Cardinal::Left],
            Direction::Left => &[Cardinal::Left],
            Direction::LeftDown => &[Cardinal::Left, Cardinal::Down],
            Direction::Down => &[Cardinal::Down],
            Direction::RightDown => &[Cardinal::Down, Cardinal::Right],
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.cardinals().len() == 2
    }
}

impl TryFrom<i32> for Direction {
    type Error = InputError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Direction::all().get(index).copied())
            .ok_or(InputError::InvalidDirection(code))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Neutral => "neutral",
            Direction::Right => "right",
            Direction::RightUp => "right-up",
            Direction::Up => "up",
            Direction::LeftUp => "left-up",
            Direction::Left => "left",
            Direction::LeftDown => "left-down",
            Direction::Down => "down",
            Direction::RightDown => "right-down",
        };
        f.write_str(name)
    }
}

/// Ordered keys produced by one direction (at most two)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySet {
    keys: [Option<KeyCode>; 2],
}

impl KeySet {
    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys.iter().flatten().copied()
    }

    pub fn contains(&self, key: KeyCode) -> bool {
        self.keys.contains(&Some(key))
    }

    pub fn len(&self) -> usize {
        self.keys.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.keys[0].is_none()
    }

    pub fn to_vec(&self) -> Vec<KeyCode> {
        self.iter().collect()
    }
}

/// Keys held down while the stick points in `direction`
pub fn direction_to_keys(direction: Direction, keymap: &KeyMap) -> KeySet {
    let mut set = KeySet::default();
    for (slot, cardinal) in set.keys.iter_mut().zip(direction.cardinals()) {
        *slot = Some(keymap.cardinal(*cardinal));
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_table() {
        let map = KeyMap::default();
        let (d, w, a, s) = (KeyCode::D, KeyCode::W, KeyCode::A, KeyCode::S);

        let expected: [(i32, Vec<KeyCode>); 9] = [
            (0, vec![]),
            (1, vec![d]),
            (2, vec![d, w]),
            (3, vec![w]),
            (4, vec![w, a]),
            (5, vec![a]),
            (6, vec![a, s]),
            (7, vec![s]),
            (8, vec![s, d]),
        ];

        for (code, keys) in expected {
            let direction = Direction::try_from(code).unwrap();
            assert_eq!(
                direction_to_keys(direction, &map).to_vec(),
                keys,
                "wrong keys for direction {}",
                code
            );
        }
    }

    #[test]
    fn test_key_set_sizes() {
        let map = KeyMap::default();
        for direction in Direction::all() {
            let expected = match direction.code() {
                0 => 0,
                1 | 3 | 5 | 7 => 1,
                _ => 2,
            };
            assert_eq!(direction_to_keys(*direction, &map).len(), expected);
            assert_eq!(direction.is_diagonal(), expected == 2);
        }
    }

    #[test]
    fn test_codes_round_trip() {
        for direction in Direction::all() {
            assert_eq!(Direction::try_from(direction.code() as i32).unwrap(), *direction);
        }
    }

    #[test]
    fn test_invalid_direction() {
        assert!(matches!(
            Direction::try_from(9),
            Err(InputError::InvalidDirection(9))
        ));
        assert!(matches!(
            Direction::try_from(-1),
            Err(InputError::InvalidDirection(-1))
        ));
        assert_eq!(Direction::from_code(42), Direction::Neutral);
        assert_eq!(Direction::from_code(-3), Direction::Neutral);
    }

    #[test]
    fn test_key_set_contains() {
        let keys = direction_to_keys(Direction::RightDown, &KeyMap::default());
        assert!(keys.contains(KeyCode::S));
        assert!(keys.contains(KeyCode::D));
        assert!(!keys.contains(KeyCode::W));
        assert!(direction_to_keys(Direction::Neutral, &KeyMap::default()).is_empty());
    }
}
