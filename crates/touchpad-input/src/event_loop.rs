//! Cooperative touch event loop
//!
//! A single task owns the [`TouchController`] and interleaves inbound touch
//! events with scheduled button releases. Nothing here is shared across
//! threads; the loop is meant to run on a current-thread runtime.

use crate::controller::TouchController;
use crate::joystick::JoystickEvent;
use crate::keys::Control;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

/// Inbound touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Joystick(JoystickEvent),
    Button(Control),
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Touch events handled
    pub events: usize,
    /// Button releases fired on schedule
    pub releases: usize,
    /// Key-ups delivered by the final shutdown
    pub flushed: usize,
}

/// Drives a [`TouchController`] from a channel of touch events
pub struct EventLoop {
    controller: TouchController,
    events: UnboundedReceiver<TouchEvent>,
    stats: LoopStats,
}

impl EventLoop {
    pub fn new(controller: TouchController, events: UnboundedReceiver<TouchEvent>) -> Self {
        Self {
            controller,
            events,
            stats: LoopStats::default(),
        }
    }

    /// Create a loop together with the sender feeding it
    pub fn channel(controller: TouchController) -> (UnboundedSender<TouchEvent>, Self) {
        let (tx, rx) = unbounded_channel();
        (tx, Self::new(controller, rx))
    }

    /// Run until every sender is dropped and all pending releases have fired
    ///
    /// On exit any stick keys still held are released.
    pub async fn run(mut self) -> LoopStats {
        info!("Touch event loop started");
        let mut closed = false;

        loop {
            let deadline = self.controller.next_release_at();
            if closed && deadline.is_none() {
                break;
            }

            tokio::select! {
                biased;

                _ = release_timer(deadline) => {
                    self.stats.releases += self.controller.fire_due(Instant::now());
                }
                event = self.events.recv(), if !closed => match event {
                    Some(event) => self.handle(event),
                    None => {
                        debug!("Touch event channel closed");
                        closed = true;
                    }
                },
            }
        }

        self.stats.flushed = self.controller.shutdown();
        info!(
            "Touch event loop stopped: {} events, {} releases",
            self.stats.events, self.stats.releases
        );
        self.stats
    }

    fn handle(&mut self, event: TouchEvent) {
        let now = Instant::now();

        // Releases already due go out before anything this event emits
        self.stats.releases += self.controller.fire_due(now);
        self.stats.events += 1;

        match event {
            TouchEvent::Joystick(joystick) => {
                self.controller.on_joystick_event(&joystick);
            }
            TouchEvent::Button(control) => self.controller.on_button_press(control, now),
        }
    }
}

async fn release_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
