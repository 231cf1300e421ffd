//! Mock key sink for testing without an emulation core
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use touchpad_input::mock::RecordingSink;
//! use touchpad_input::{KeyCode, KeySink, TouchController};
//!
//! let recorder = Rc::new(RecordingSink::new());
//! let sink: Rc<dyn KeySink> = recorder.clone();
//! let controller = TouchController::with_defaults(&sink);
//! # drop(controller);
//! assert!(recorder.events().is_empty());
//! ```

use crate::keys::KeyCode;
use crate::sink::{KeyEvent, KeySink};
use std::cell::RefCell;
use std::collections::BTreeSet;
use tokio::time::Instant;

/// Key sink that records every call and tracks which keys are down
///
/// Follows the sink contract: a repeated down or up does not change the
/// pressed set, but every call is still recorded.
#[derive(Debug, Default)]
pub struct RecordingSink {
    timeline: RefCell<Vec<(Instant, KeyEvent)>>,
    pressed: RefCell<BTreeSet<KeyCode>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls in arrival order
    pub fn events(&self) -> Vec<KeyEvent> {
        self.timeline.borrow().iter().map(|(_, event)| *event).collect()
    }

    /// All calls with the instant they arrived
    pub fn timeline(&self) -> Vec<(Instant, KeyEvent)> {
        self.timeline.borrow().clone()
    }

    /// Keys currently held down
    pub fn pressed(&self) -> Vec<KeyCode> {
        self.pressed.borrow().iter().copied().collect()
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.borrow().contains(&key)
    }

    /// Forget recorded calls, keeping the pressed set
    pub fn clear(&self) {
        self.timeline.borrow_mut().clear();
    }

    fn record(&self, event: KeyEvent) {
        self.timeline.borrow_mut().push((Instant::now(), event));
    }
}

impl KeySink for RecordingSink {
    fn key_down(&self, code: KeyCode) {
        self.record(KeyEvent::Down(code));
        self.pressed.borrow_mut().insert(code);
    }

    fn key_up(&self, code: KeyCode) {
        self.record(KeyEvent::Up(code));
        self.pressed.borrow_mut().remove(&code);
    }
}
