//! Joystick state-change events
//!
//! The on-screen joystick reports an angle, a power (distance from centre)
//! and the direction it already resolved. Hosts that only have the raw
//! polar values can resolve the direction with [`JoystickEvent::from_polar`].

use crate::direction::Direction;

/// Minimum power for the stick to leave neutral
pub const DEFAULT_MIN_POWER: f32 = 10.0;

/// Angular width of one direction sector in degrees
const SECTOR_DEGREES: f32 = 45.0;

/// One joystick state change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickEvent {
    /// Degrees, 0 = right, counter-clockwise positive
    pub angle: f32,
    pub power: f32,
    pub direction: Direction,
}

impl JoystickEvent {
    pub fn new(angle: f32, power: f32, direction: Direction) -> Self {
        Self {
            angle,
            power,
            direction,
        }
    }

    /// Event as delivered by a joystick view, with the raw direction code
    pub fn from_raw(angle: f32, power: f32, direction: i32) -> Self {
        Self::new(angle, power, Direction::from_code(direction))
    }

    /// Event carrying only a direction
    pub fn direction(direction: Direction) -> Self {
        Self::new(0.0, 0.0, direction)
    }

    /// Resolve the direction from polar values
    pub fn from_polar(angle: f32, power: f32, min_power: f32) -> Self {
        Self::new(angle, power, quantize(angle, power, min_power))
    }
}

/// Map an angle onto one of eight 45° sectors centred on each direction
fn quantize(angle: f32, power: f32, min_power: f32) -> Direction {
    if !angle.is_finite() || !power.is_finite() || power < min_power {
        return Direction::Neutral;
    }

    let normalized = angle.rem_euclid(360.0);
    let sector = ((normalized + SECTOR_DEGREES / 2.0) / SECTOR_DEGREES).floor() as usize % 8;

    // Direction::all()[0] is neutral
    Direction::all()[sector + 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_centres() {
        let expected = [
            (0.0, Direction::Right),
            (45.0, Direction::RightUp),
            (90.0, Direction::Up),
            (135.0, Direction::LeftUp),
            (180.0, Direction::Left),
            (225.0, Direction::LeftDown),
            (270.0, Direction::Down),
            (315.0, Direction::RightDown),
        ];

        for (angle, direction) in expected {
            let event = JoystickEvent::from_polar(angle, 50.0, DEFAULT_MIN_POWER);
            assert_eq!(event.direction, direction, "angle {}", angle);
        }
    }

    #[test]
    fn test_sector_boundaries() {
        assert_eq!(quantize(22.4, 50.0, 10.0), Direction::Right);
        assert_eq!(quantize(22.5, 50.0, 10.0), Direction::RightUp);
        assert_eq!(quantize(337.5, 50.0, 10.0), Direction::Right);
        assert_eq!(quantize(-10.0, 50.0, 10.0), Direction::Right);
        assert_eq!(quantize(-90.0, 50.0, 10.0), Direction::Down);
        assert_eq!(quantize(450.0, 50.0, 10.0), Direction::Up);
    }

    #[test]
    fn test_below_threshold_is_neutral() {
        assert_eq!(quantize(90.0, 9.9, 10.0), Direction::Neutral);
        assert_eq!(quantize(90.0, 10.0, 10.0), Direction::Up);
    }

    #[test]
    fn test_non_finite_is_neutral() {
        assert_eq!(quantize(f32::NAN, 50.0, 10.0), Direction::Neutral);
        assert_eq!(quantize(0.0, f32::NAN, 10.0), Direction::Neutral);
        assert_eq!(quantize(f32::INFINITY, 50.0, 10.0), Direction::Neutral);
        assert_eq!(quantize(f32::NEG_INFINITY, 50.0, 10.0), Direction::Neutral);
        assert_eq!(quantize(90.0, f32::INFINITY, 10.0), Direction::Neutral);

        let event = JoystickEvent::from_polar(f32::INFINITY, 50.0, DEFAULT_MIN_POWER);
        assert_eq!(event.direction, Direction::Neutral);
    }

    #[test]
    fn test_from_raw_clamps_invalid_code() {
        let event = JoystickEvent::from_raw(0.0, 80.0, 12);
        assert_eq!(event.direction, Direction::Neutral);
        assert_eq!(JoystickEvent::from_raw(0.0, 80.0, 1).direction, Direction::Right);
    }
}
