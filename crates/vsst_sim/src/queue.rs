//! Deferred port writes, ordered by target tick.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use vsst_signal::Signal;

/// A write waiting for its tick.
#[derive(Debug, Clone)]
pub struct QueuedWrite {
    port: String,
    tick: u64,
    seq: u64,
    signal: Signal,
}

impl QueuedWrite {
    /// Target port.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Absolute tick the write applies at.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Value to write.
    pub fn signal(&self) -> &Signal {
        &self.signal
    }
}

impl PartialEq for QueuedWrite {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedWrite {}

impl PartialOrd for QueuedWrite {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedWrite {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.tick, self.seq).cmp(&(other.tick, other.seq))
    }
}

/// Min-queue of deferred writes.
///
/// Writes pop in tick order; writes sharing a tick pop in the order they
/// were pushed.
#[derive(Debug, Default)]
pub struct WriteQueue {
    heap: BinaryHeap<Reverse<QueuedWrite>>,
    next_seq: u64,
}

impl WriteQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `signal` for `port` at `tick`.
    pub fn push(&mut self, port: impl Into<String>, tick: u64, signal: Signal) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(QueuedWrite {
            port: port.into(),
            tick,
            seq,
            signal,
        }));
    }

    /// Removes the next write due at or before `tick`.
    pub fn pop_due(&mut self, tick: u64) -> Option<QueuedWrite> {
        match self.heap.peek() {
            Some(Reverse(next)) if next.tick <= tick => self.heap.pop().map(|r| r.0),
            _ => None,
        }
    }

    /// Tick of the earliest pending write.
    pub fn next_tick(&self) -> Option<u64> {
        self.heap.peek().map(|r| r.0.tick)
    }

    /// Number of pending writes.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no writes are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
