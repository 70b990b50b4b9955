//! Deterministic delayed-task queue.
//!
//! Chained effects ("zoom in, then zoom back out 300ms later") are stored
//! with an absolute due time on the frame clock and drained at the top of
//! each tick. There are no timer callbacks and no threads, so the same
//! sequence of frame deltas always fires the same tasks in the same order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A task waiting for its due time.
#[derive(Clone, Debug)]
pub struct ScheduledTask<T> {
    /// Absolute due time on the frame clock (ms).
    pub due_ms: f64,
    /// Insertion sequence number; breaks ties in FIFO order.
    pub sequence: u64,
    /// The deferred work.
    pub task: T,
}

impl<T> PartialEq for ScheduledTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for ScheduledTask<T> {}

impl<T> PartialOrd for ScheduledTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTask<T> {
    // Reversed so BinaryHeap (a max-heap) pops the earliest task first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-heap of tasks keyed by due time.
#[derive(Debug)]
pub struct DelayedTaskQueue<T> {
    /// Pending tasks.
    heap: BinaryHeap<ScheduledTask<T>>,
    /// Next sequence number.
    next_sequence: u64,
}

impl<T> DelayedTaskQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Schedules `task` to fire `delay_ms` after `now_ms`.
    ///
    /// Negative or non-finite delays fire on the next drain.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: T) {
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledTask {
            due_ms: now_ms + delay,
            sequence,
            task,
        });
    }

    /// Removes and returns every task due at or before `now_ms`, in due-time
    /// order (ties in scheduling order).
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|next| next.due_ms <= now_ms) {
            if let Some(entry) = self.heap.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.due_ms)
    }

    /// Number of pending tasks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Cancels every pending task.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T> Default for DelayedTaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_in_due_order() {
        let mut queue = DelayedTaskQueue::new();
        queue.schedule(0.0, 300.0, "c");
        queue.schedule(0.0, 100.0, "a");
        queue.schedule(0.0, 200.0, "b");

        assert!(queue.drain_due(50.0).is_empty());
        assert_eq!(queue.drain_due(250.0), vec!["a", "b"]);
        assert_eq!(queue.next_due_ms(), Some(300.0));
        assert_eq!(queue.drain_due(1000.0), vec!["c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut queue = DelayedTaskQueue::new();
        for i in 0..5 {
            queue.schedule(10.0, 90.0, i);
        }
        assert_eq!(queue.drain_due(100.0), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_negative_delay_fires_immediately() {
        let mut queue = DelayedTaskQueue::new();
        queue.schedule(40.0, -10.0, 1);
        queue.schedule(40.0, f64::NAN, 2);
        assert_eq!(queue.drain_due(40.0), vec![1, 2]);
    }
}
