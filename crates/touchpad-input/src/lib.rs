//! Touch input translation
//!
//! Converts on-screen joystick gestures and button taps into the key-down /
//! key-up calls of an emulation core's key interface.
//!
//! - [`direction`] maps a joystick direction to the keys it holds
//! - [`tracker`] diffs successive directions into up/down calls
//! - [`dispatcher`] turns a button tap into a down now and an up later
//! - [`event_loop`] runs both on one cooperative task
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use touchpad_input::mock::RecordingSink;
//! use touchpad_input::{Direction, JoystickEvent, KeyCode, KeyEvent, KeySink, TouchController};
//!
//! let recorder = Rc::new(RecordingSink::new());
//! let sink: Rc<dyn KeySink> = recorder.clone();
//! let mut controller = TouchController::with_defaults(&sink);
//!
//! controller.on_joystick_event(&JoystickEvent::direction(Direction::RightUp));
//! assert_eq!(
//!     recorder.events(),
//!     vec![KeyEvent::Down(KeyCode::D), KeyEvent::Down(KeyCode::W)]
//! );
//! ```

pub mod controller;
pub mod direction;
pub mod dispatcher;
pub mod event_loop;
pub mod joystick;
pub mod keys;
pub mod mock;
pub mod scheduler;
pub mod sink;
pub mod tracker;

pub use controller::{ButtonSettings, DEFAULT_RELEASE_DELAY, TouchController};
pub use direction::{Direction, KeySet, direction_to_keys};
pub use dispatcher::{ButtonDispatcher, ReleasePolicy};
pub use event_loop::{EventLoop, LoopStats, TouchEvent};
pub use joystick::{DEFAULT_MIN_POWER, JoystickEvent};
pub use keys::{ButtonBinding, Cardinal, Control, KeyCode, KeyMap};
pub use scheduler::{PendingRelease, ReleaseScheduler, TaskId};
pub use sink::{KeyEvent, KeySink, SinkHandle};
pub use tracker::InputStateTracker;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid direction code: {0}")]
    InvalidDirection(i32),

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Unknown control: {0}")]
    UnknownControl(String),
}
