//! One-shot release timers
//!
//! Pending releases are ordered by deadline, then by the order they were
//! scheduled, so releases due at the same instant fire first-in first-out.

use crate::keys::{Control, KeyCode};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tokio::time::Instant;

/// Identifier of a scheduled release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A key release waiting for its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRelease {
    pub id: TaskId,
    pub control: Control,
    pub key: KeyCode,
    pub due: Instant,
}

/// Timer queue of pending key releases
#[derive(Debug, Default)]
pub struct ReleaseScheduler {
    queue: BinaryHeap<Reverse<(Instant, TaskId)>>,
    tasks: HashMap<TaskId, PendingRelease>,
    next_id: u64,
}

impl ReleaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a release of `key` at `due`
    pub fn schedule(&mut self, control: Control, key: KeyCode, due: Instant) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        self.queue.push(Reverse((due, id)));
        self.tasks.insert(
            id,
            PendingRelease {
                id,
                control,
                key,
                due,
            },
        );
        id
    }

    /// Cancel a pending release, returning it if it had not fired yet
    pub fn cancel(&mut self, id: TaskId) -> Option<PendingRelease> {
        // Heap entry stays behind and is skipped when it surfaces
        self.tasks.remove(&id)
    }

    /// Deadline of the earliest live release
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse((due, _))| *due)
    }

    /// Remove and return every release due at or before `now`, in firing order
    pub fn pop_due(&mut self, now: Instant) -> Vec<PendingRelease> {
        let mut due = Vec::new();
        while let Some(Reverse((deadline, id))) = self.queue.peek().copied() {
            if deadline > now {
                break;
            }
            self.queue.pop();
            if let Some(task) = self.tasks.remove(&id) {
                due.push(task);
            }
        }
        due
    }

    /// Remove and return every pending release, in firing order
    pub fn drain(&mut self) -> Vec<PendingRelease> {
        let mut all = Vec::with_capacity(self.tasks.len());
        while let Some(Reverse((_, id))) = self.queue.pop() {
            if let Some(task) = self.tasks.remove(&id) {
                all.push(task);
            }
        }
        all
    }

    /// Number of live releases
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.queue.peek() {
            if self.tasks.contains_key(id) {
                break;
            }
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let base = Instant::now();
        let mut scheduler = ReleaseScheduler::new();

        scheduler.schedule(Control::A, KeyCode::J, base + ms(20));
        scheduler.schedule(Control::B, KeyCode::K, base + ms(10));

        assert_eq!(scheduler.next_deadline(), Some(base + ms(10)));

        let fired = scheduler.pop_due(base + ms(15));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].key, KeyCode::K);

        let fired = scheduler.pop_due(base + ms(20));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].key, KeyCode::J);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let due = Instant::now() + ms(10);
        let mut scheduler = ReleaseScheduler::new();

        let first = scheduler.schedule(Control::Start, KeyCode::ENTER, due);
        let second = scheduler.schedule(Control::A, KeyCode::J, due);
        let third = scheduler.schedule(Control::B, KeyCode::K, due);

        let order: Vec<TaskId> = scheduler.pop_due(due).iter().map(|t| t.id).collect();
        assert_eq!(order, vec![first, second, third]);
    }

    #[test]
    fn test_cancel() {
        let base = Instant::now();
        let mut scheduler = ReleaseScheduler::new();

        let early = scheduler.schedule(Control::A, KeyCode::J, base + ms(5));
        scheduler.schedule(Control::A, KeyCode::J, base + ms(30));

        assert!(scheduler.cancel(early).is_some());
        assert!(scheduler.cancel(early).is_none());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(base + ms(30)));
        assert!(scheduler.pop_due(base + ms(10)).is_empty());
    }

    #[test]
    fn test_drain() {
        let base = Instant::now();
        let mut scheduler = ReleaseScheduler::new();

        scheduler.schedule(Control::B, KeyCode::K, base + ms(50));
        scheduler.schedule(Control::A, KeyCode::J, base + ms(10));

        let keys: Vec<KeyCode> = scheduler.drain().iter().map(|t| t.key).collect();
        assert_eq!(keys, vec![KeyCode::J, KeyCode::K]);
        assert!(scheduler.is_empty());
    }
}
