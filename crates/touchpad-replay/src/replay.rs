//! Feeding a script through the event loop

use anyhow::{Context, Result};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use touchpad_config::TouchpadConfig;
use touchpad_input::{EventLoop, KeyCode, KeySink, LoopStats, TouchController, TouchEvent};
use tracing::info;

/// Key sink that logs every call and tracks the held set
#[derive(Debug)]
pub struct LoggingSink {
    started: Instant,
    held: RefCell<BTreeSet<KeyCode>>,
    released: RefCell<Vec<KeyCode>>,
    calls: Cell<usize>,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            held: RefCell::new(BTreeSet::new()),
            released: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// The last `n` keys released, oldest first
    pub fn last_released(&self, n: usize) -> Vec<KeyCode> {
        let released = self.released.borrow();
        released[released.len().saturating_sub(n)..].to_vec()
    }

    fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

impl KeySink for LoggingSink {
    fn key_down(&self, code: KeyCode) {
        self.calls.set(self.calls.get() + 1);
        let fresh = self.held.borrow_mut().insert(code);
        info!(
            "[{:>6} ms] key_down {}{}",
            self.elapsed_ms(),
            code,
            if fresh { "" } else { " (already down)" }
        );
    }

    fn key_up(&self, code: KeyCode) {
        self.calls.set(self.calls.get() + 1);
        self.held.borrow_mut().remove(&code);
        self.released.borrow_mut().push(code);
        info!("[{:>6} ms] key_up   {}", self.elapsed_ms(), code);
    }
}

/// Outcome of one replay
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub events: usize,
    pub releases: usize,
    pub flushed: usize,
    pub key_calls: usize,
    /// Keys the script left held, released only when the loop stopped
    pub stuck: Vec<String>,
}

impl Summary {
    fn new(stats: LoopStats, sink: &LoggingSink) -> Self {
        // Shutdown is the last thing to reach the sink
        let stuck = sink.last_released(stats.flushed);
        Self {
            events: stats.events,
            releases: stats.releases,
            flushed: stats.flushed,
            key_calls: sink.calls(),
            stuck: stuck.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Replay timed events against a fresh logging sink
pub async fn replay(config: &TouchpadConfig, events: Vec<(Duration, TouchEvent)>) -> Result<Summary> {
    let recorder = Rc::new(LoggingSink::new());
    let sink: Rc<dyn KeySink> = recorder.clone();
    let controller = TouchController::new(
        &sink,
        config.keymap.clone(),
        config.controls.button_settings(),
    );
    let (tx, event_loop) = EventLoop::channel(controller);

    info!(
        "Replaying {} steps (release delay {} ms, policy {})",
        events.len(),
        config.controls.release_delay_ms,
        config.controls.release_policy
    );

    let start = Instant::now();
    let driver = async move {
        for (offset, event) in events {
            sleep_until(start + offset).await;
            tx.send(event).context("Event loop stopped early")?;
        }
        Ok::<(), anyhow::Error>(())
    };

    let (stats, fed) = tokio::join!(event_loop.run(), driver);
    fed?;

    Ok(Summary::new(stats, &recorder))
}
