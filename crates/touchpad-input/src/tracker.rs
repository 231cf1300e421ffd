//! Joystick state tracking
//!
//! Turns successive joystick directions into key-up / key-down calls.
//! The keys logically held are always the keys of the last direction seen.

use crate::direction::{Direction, KeySet, direction_to_keys};
use crate::joystick::JoystickEvent;
use crate::keys::KeyMap;
use crate::sink::{KeyEvent, KeySink};
use tracing::trace;

/// Tracks the previous joystick direction and diffs against it
#[derive(Debug, Clone, Default)]
pub struct InputStateTracker {
    previous: Direction,
}

impl InputStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction of the last processed event
    pub fn previous_direction(&self) -> Direction {
        self.previous
    }

    /// Keys currently held by the stick
    pub fn held_keys(&self, keymap: &KeyMap) -> KeySet {
        direction_to_keys(self.previous, keymap)
    }

    /// Process one joystick event
    ///
    /// Keys of the previous direction that are not part of the new one are
    /// released first, then every key of the new direction is pressed, even
    /// ones that were already down.
    pub fn on_joystick_event<S: KeySink + ?Sized>(
        &mut self,
        event: &JoystickEvent,
        keymap: &KeyMap,
        sink: &S,
    ) -> Vec<KeyEvent> {
        let new_keys = direction_to_keys(event.direction, keymap);
        let old_keys = direction_to_keys(self.previous, keymap);

        let mut emitted = Vec::with_capacity(old_keys.len() + new_keys.len());
        emitted.extend(
            old_keys
                .iter()
                .filter(|key| !new_keys.contains(*key))
                .map(KeyEvent::Up),
        );
        emitted.extend(new_keys.iter().map(KeyEvent::Down));

        trace!(
            "Joystick {} -> {} (angle {:.1}, power {:.1})",
            self.previous, event.direction, event.angle, event.power
        );
        for key_event in &emitted {
            trace!("Emit {}", key_event);
            key_event.send(sink);
        }

        self.previous = event.direction;
        emitted
    }

    /// Release every held key and return to neutral
    pub fn release_all<S: KeySink + ?Sized>(&mut self, keymap: &KeyMap, sink: &S) -> Vec<KeyEvent> {
        let emitted: Vec<KeyEvent> = self.held_keys(keymap).iter().map(KeyEvent::Up).collect();
        for key_event in &emitted {
            key_event.send(sink);
        }
        self.previous = Direction::Neutral;
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyCode;
    use crate::mock::RecordingSink;

    fn feed(tracker: &mut InputStateTracker, sink: &RecordingSink, code: i32) -> Vec<KeyEvent> {
        let event = JoystickEvent::from_raw(0.0, 50.0, code);
        tracker.on_joystick_event(&event, &KeyMap::default(), sink)
    }

    #[test]
    fn test_starts_neutral() {
        let tracker = InputStateTracker::new();
        assert_eq!(tracker.previous_direction(), Direction::Neutral);
        assert!(tracker.held_keys(&KeyMap::default()).is_empty());
    }

    #[test]
    fn test_neutral_right_rightup_neutral() {
        let sink = RecordingSink::new();
        let mut tracker = InputStateTracker::new();

        assert!(feed(&mut tracker, &sink, 0).is_empty());
        assert_eq!(feed(&mut tracker, &sink, 1), vec![KeyEvent::Down(KeyCode::D)]);
        assert_eq!(
            feed(&mut tracker, &sink, 2),
            vec![KeyEvent::Down(KeyCode::D), KeyEvent::Down(KeyCode::W)]
        );
        assert_eq!(
            feed(&mut tracker, &sink, 0),
            vec![KeyEvent::Up(KeyCode::D), KeyEvent::Up(KeyCode::W)]
        );
        assert!(sink.pressed().is_empty());
    }

    #[test]
    fn test_all_transitions() {
        let keymap = KeyMap::default();

        for from in Direction::all() {
            for to in Direction::all() {
                let sink = RecordingSink::new();
                let mut tracker = InputStateTracker::new();
                feed(&mut tracker, &sink, from.code() as i32);
                sink.clear();

                let emitted = feed(&mut tracker, &sink, to.code() as i32);
                let old_keys = direction_to_keys(*from, &keymap);
                let new_keys = direction_to_keys(*to, &keymap);

                let ups: Vec<KeyCode> = emitted
                    .iter()
                    .filter(|e| !e.is_down())
                    .map(|e| e.key())
                    .collect();
                let downs: Vec<KeyCode> = emitted
                    .iter()
                    .filter(|e| e.is_down())
                    .map(|e| e.key())
                    .collect();
                let expected_ups: Vec<KeyCode> =
                    old_keys.iter().filter(|k| !new_keys.contains(*k)).collect();

                assert_eq!(ups, expected_ups, "{} -> {}", from, to);
                assert_eq!(downs, new_keys.to_vec(), "{} -> {}", from, to);

                // Every release comes before every press
                let first_down = emitted.iter().position(|e| e.is_down()).unwrap_or(emitted.len());
                assert!(emitted[first_down..].iter().all(|e| e.is_down()));

                // Sink ends up holding exactly the new direction's keys
                let mut pressed = new_keys.to_vec();
                pressed.sort();
                assert_eq!(sink.pressed(), pressed, "{} -> {}", from, to);
                assert_eq!(sink.events(), emitted);
            }
        }
    }

    #[test]
    fn test_same_direction_repeats_downs() {
        let sink = RecordingSink::new();
        let mut tracker = InputStateTracker::new();

        feed(&mut tracker, &sink, 6);
        let second = feed(&mut tracker, &sink, 6);

        assert_eq!(
            second,
            vec![KeyEvent::Down(KeyCode::A), KeyEvent::Down(KeyCode::S)]
        );
    }

    #[test]
    fn test_opposite_diagonal_releases_first() {
        let sink = RecordingSink::new();
        let mut tracker = InputStateTracker::new();

        feed(&mut tracker, &sink, 2);
        let emitted = feed(&mut tracker, &sink, 6);

        assert_eq!(
            emitted,
            vec![
                KeyEvent::Up(KeyCode::D),
                KeyEvent::Up(KeyCode::W),
                KeyEvent::Down(KeyCode::A),
                KeyEvent::Down(KeyCode::S),
            ]
        );
    }

    #[test]
    fn test_invalid_direction_releases_like_neutral() {
        let sink = RecordingSink::new();
        let mut tracker = InputStateTracker::new();

        feed(&mut tracker, &sink, 3);
        let emitted = feed(&mut tracker, &sink, 99);

        assert_eq!(emitted, vec![KeyEvent::Up(KeyCode::W)]);
        assert_eq!(tracker.previous_direction(), Direction::Neutral);
    }

    #[test]
    fn test_release_all() {
        let sink = RecordingSink::new();
        let mut tracker = InputStateTracker::new();

        feed(&mut tracker, &sink, 8);
        let released = tracker.release_all(&KeyMap::default(), &sink);

        assert_eq!(
            released,
            vec![KeyEvent::Up(KeyCode::S), KeyEvent::Up(KeyCode::D)]
        );
        assert!(sink.pressed().is_empty());
        assert_eq!(tracker.previous_direction(), Direction::Neutral);
        assert!(tracker.release_all(&KeyMap::default(), &sink).is_empty());
    }
}
