//! Touch controller
//!
//! Composes the stick tracker and the button dispatcher behind the two
//! callback entry points a host UI wires its touch controls to.

use crate::dispatcher::{ButtonDispatcher, ReleasePolicy};
use crate::joystick::JoystickEvent;
use crate::keys::{Control, KeyMap};
use crate::sink::{KeyEvent, KeySink, SinkHandle};
use crate::tracker::InputStateTracker;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default delay between a button's key-down and key-up
pub const DEFAULT_RELEASE_DELAY: Duration = Duration::from_millis(10);

/// Button timing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonSettings {
    pub release_delay: Duration,
    pub policy: ReleasePolicy,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            release_delay: DEFAULT_RELEASE_DELAY,
            policy: ReleasePolicy::default(),
        }
    }
}

/// Input translation for one touch surface
#[derive(Debug)]
pub struct TouchController {
    keymap: KeyMap,
    release_delay: Duration,
    tracker: InputStateTracker,
    dispatcher: ButtonDispatcher,
    sink: SinkHandle,
}

impl TouchController {
    /// Create a controller emitting into a host-owned sink
    pub fn new(sink: &Rc<dyn KeySink>, keymap: KeyMap, settings: ButtonSettings) -> Self {
        Self {
            keymap,
            release_delay: settings.release_delay,
            tracker: InputStateTracker::new(),
            dispatcher: ButtonDispatcher::new(settings.policy),
            sink: SinkHandle::new(sink),
        }
    }

    /// Create with the default key map and timings
    pub fn with_defaults(sink: &Rc<dyn KeySink>) -> Self {
        Self::new(sink, KeyMap::default(), ButtonSettings::default())
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn tracker(&self) -> &InputStateTracker {
        &self.tracker
    }

    /// Joystick callback
    pub fn on_joystick_event(&mut self, event: &JoystickEvent) -> Vec<KeyEvent> {
        self.tracker
            .on_joystick_event(event, &self.keymap, &self.sink)
    }

    /// Button callback
    pub fn on_button_press(&mut self, control: Control, now: Instant) {
        let binding = self.keymap.binding(control, self.release_delay);
        self.dispatcher.on_button_press(&binding, now, &self.sink);
    }

    /// When the next scheduled release is due
    pub fn next_release_at(&mut self) -> Option<Instant> {
        self.dispatcher.next_release_at()
    }

    /// Fire scheduled releases due at or before `now`
    pub fn fire_due(&mut self, now: Instant) -> usize {
        self.dispatcher.fire_due(now, &self.sink)
    }

    /// Number of button releases still pending
    pub fn pending_releases(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Release everything still held, returning how many key-ups reached the sink
    ///
    /// If the sink is already gone the held state is dropped and nothing is
    /// delivered.
    pub fn shutdown(&mut self) -> usize {
        let alive = self.sink.is_alive();
        let stick = self.tracker.release_all(&self.keymap, &self.sink).len();
        let buttons = self.dispatcher.flush(&self.sink);

        if !alive {
            debug!(
                "Key sink gone at shutdown, discarded {} held keys",
                stick + buttons
            );
            return 0;
        }

        info!("Touch controller shut down ({} keys released)", stick + buttons);
        stick + buttons
    }
}
