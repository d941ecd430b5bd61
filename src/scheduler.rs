/// Deterministic event scheduler.
///
/// Uses a `BinaryHeap` with reversed `Ord` on `Event` to act as a
/// min-heap keyed by the event total order. Ties are resolved by the
/// key alone, never by heap layout or insertion order, so two runs on
/// the same input always dispatch events identically.

use std::collections::BinaryHeap;

use crate::event::Event;

/// The min-priority queue of pending events.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Min-heap (via reversed Ord on Event).
    queue: BinaryHeap<Event>,
}

impl Scheduler {
    /// Create a new, empty scheduler.
    pub fn new() -> Self {
        Scheduler {
            queue: BinaryHeap::new(),
        }
    }

    /// Enqueue an event.
    pub fn schedule(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Pop the next event (smallest key under the event total order).
    ///
    /// Returns `None` when the queue is empty.
    pub fn pop_next(&mut self) -> Option<Event> {
        self.queue.pop()
    }

    /// Peek at the next event without removing it.
    pub fn peek_next(&self) -> Option<&Event> {
        self.queue.peek()
    }

    /// Returns `true` if the event queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
