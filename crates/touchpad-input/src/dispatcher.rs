//! On-screen button presses
//!
//! A tap only reports that a button was pressed, so each press is turned into
//! a key-down now and a key-up a fixed delay later.

use crate::keys::{ButtonBinding, Control};
use crate::scheduler::{ReleaseScheduler, TaskId};
use crate::sink::{KeyEvent, KeySink};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tokio::time::Instant;
use tracing::trace;

/// How a press interacts with a release still pending for the same button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Every press gets its own release; overlapping presses produce
    /// overlapping down/up pairs
    #[default]
    Overlapping,
    /// A press replaces the pending release of the same button
    Retrigger,
}

impl fmt::Display for ReleasePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleasePolicy::Overlapping => f.write_str("overlapping"),
            ReleasePolicy::Retrigger => f.write_str("retrigger"),
        }
    }
}

/// Emits button presses and owns their pending releases
#[derive(Debug, Default)]
pub struct ButtonDispatcher {
    policy: ReleasePolicy,
    scheduler: ReleaseScheduler,
    latest: HashMap<Control, TaskId>,
}

impl ButtonDispatcher {
    pub fn new(policy: ReleasePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }

    /// Press a button: key-down immediately, key-up after `binding.delay`
    pub fn on_button_press<S: KeySink + ?Sized>(
        &mut self,
        binding: &ButtonBinding,
        now: Instant,
        sink: &S,
    ) -> TaskId {
        if self.policy == ReleasePolicy::Retrigger
            && let Some(previous) = self.latest.get(&binding.control)
            && self.scheduler.cancel(*previous).is_some()
        {
            trace!("Replacing pending release of {}", binding.control);
        }

        trace!("Emit {} for {}", KeyEvent::Down(binding.key), binding.control);
        sink.key_down(binding.key);

        let id = self
            .scheduler
            .schedule(binding.control, binding.key, now + binding.delay);
        self.latest.insert(binding.control, id);
        id
    }

    /// When the next release is due
    pub fn next_release_at(&mut self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Fire every release due at or before `now`
    pub fn fire_due<S: KeySink + ?Sized>(&mut self, now: Instant, sink: &S) -> usize {
        let due = self.scheduler.pop_due(now);
        for release in &due {
            trace!("Emit {} for {}", KeyEvent::Up(release.key), release.control);
            sink.key_up(release.key);
            self.forget(release.control, release.id);
        }
        due.len()
    }

    /// Fire every pending release now, in deadline order
    pub fn flush<S: KeySink + ?Sized>(&mut self, sink: &S) -> usize {
        let pending = self.scheduler.drain();
        for release in &pending {
            sink.key_up(release.key);
        }
        self.latest.clear();
        pending.len()
    }

    /// Number of releases not yet fired
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    fn forget(&mut self, control: Control, id: TaskId) {
        if self.latest.get(&control) == Some(&id) {
            self.latest.remove(&control);
        }
    }
}
