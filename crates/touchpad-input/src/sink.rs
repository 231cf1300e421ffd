//! Key sink contract
//!
//! The sink is the emulation core's key interface. It is owned by the host;
//! this crate only holds a [`SinkHandle`] to it so that releases scheduled
//! before teardown never reach a destroyed sink.

use crate::keys::KeyCode;
use std::fmt;
use std::rc::{Rc, Weak};

/// Receiver of key-down / key-up calls
///
/// Implementations must treat a `key_down` on a key that is already down as
/// a no-op, and likewise a `key_up` on a key that is already up. The stick
/// tracker re-sends key-down for every key of the current direction on each
/// event and relies on this.
pub trait KeySink {
    fn key_down(&self, code: KeyCode);
    fn key_up(&self, code: KeyCode);
}

impl<S: KeySink + ?Sized> KeySink for Rc<S> {
    fn key_down(&self, code: KeyCode) {
        (**self).key_down(code)
    }

    fn key_up(&self, code: KeyCode) {
        (**self).key_up(code)
    }
}

/// A single emitted key call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    Down(KeyCode),
    Up(KeyCode),
}

impl KeyEvent {
    pub fn key(&self) -> KeyCode {
        match self {
            KeyEvent::Down(key) | KeyEvent::Up(key) => *key,
        }
    }

    pub fn is_down(&self) -> bool {
        matches!(self, KeyEvent::Down(_))
    }

    /// Deliver this event to a sink
    pub fn send<S: KeySink + ?Sized>(&self, sink: &S) {
        match *self {
            KeyEvent::Down(key) => sink.key_down(key),
            KeyEvent::Up(key) => sink.key_up(key),
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEvent::Down(key) => write!(f, "down({})", key),
            KeyEvent::Up(key) => write!(f, "up({})", key),
        }
    }
}

/// Non-owning handle to a host-owned sink
///
/// Calls made after the sink is dropped are skipped.
#[derive(Clone)]
pub struct SinkHandle {
    inner: Weak<dyn KeySink>,
}

impl SinkHandle {
    pub fn new(sink: &Rc<dyn KeySink>) -> Self {
        Self {
            inner: Rc::downgrade(sink),
        }
    }

    /// Whether the sink still exists
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn deliver(&self, event: KeyEvent) {
        match self.inner.upgrade() {
            Some(sink) => event.send(&*sink),
            None => tracing::debug!("Key sink gone, dropping {}", event),
        }
    }
}

impl KeySink for SinkHandle {
    fn key_down(&self, code: KeyCode) {
        self.deliver(KeyEvent::Down(code));
    }

    fn key_up(&self, code: KeyCode) {
        self.deliver(KeyEvent::Up(code));
    }
}

impl fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
