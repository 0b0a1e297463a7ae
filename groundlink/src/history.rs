//! Capacity-bounded FIFO history.
//!
//! Backs both the flight-path trail and the chart series: values are appended
//! at the back and the oldest value is evicted from the front once the
//! capacity is exceeded.

use std::collections::VecDeque;

/// Rolling history buffer with a fixed capacity (most recent last).
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history holding at most `capacity` values.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting from the front while over capacity.
    pub fn push(&mut self, value: T) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Maximum number of retained values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recently appended value.
    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// Copy the contents out, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}
