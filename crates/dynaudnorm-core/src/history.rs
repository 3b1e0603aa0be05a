//! Fixed-capacity FIFO of gain values.
//!
//! Backs the minimum filter and Gaussian smoothing stages. Storage is
//! allocated once at construction; pushes and pops never allocate.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Bounded FIFO of `f64` values.
#[derive(Debug, Clone)]
pub struct GainQueue {
    data: Vec<f64>,
    head: usize,
    len: usize,
}

impl GainQueue {
    /// Create an empty queue holding at most `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of values.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no values are queued.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// Append a value. When full, the oldest value is overwritten.
    pub fn push(&mut self, value: f64) {
        let cap = self.data.len();
        let tail = (self.head + self.len) % cap;
        self.data[tail] = value;
        if self.len == cap {
            self.head = (self.head + 1) % cap;
        } else {
            self.len += 1;
        }
    }

    /// Remove and return the oldest value.
    pub fn pop(&mut self) -> Option<f64> {
        if self.len == 0 {
            return None;
        }
        let value = self.data[self.head];
        self.head = (self.head + 1) % self.data.len();
        self.len -= 1;
        Some(value)
    }

    /// Value at position `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<f64> {
        (index < self.len).then(|| self.data[(self.head + index) % self.data.len()])
    }

    /// Smallest queued value, or `None` when empty.
    pub fn min(&self) -> Option<f64> {
        (0..self.len)
            .filter_map(|i| self.get(i))
            .reduce(f64::min)
    }

    /// Fill the queue with `count` copies of `value` after clearing it.
    pub fn fill(&mut self, value: f64, count: usize) {
        self.clear();
        for _ in 0..count.min(self.data.len()) {
            self.push(value);
        }
    }

    /// Remove all values.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
