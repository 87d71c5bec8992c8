// SPDX-License-Identifier: MPL-2.0
//! Circular buffer implementation for diagnostic event storage.
//!
//! This module provides a memory-bounded ring buffer that automatically
//! evicts the oldest entries when capacity is reached.

use std::collections::VecDeque;

/// Buffer capacity bounds (10 to 5000 events).
pub mod buffer_capacity_bounds {
    pub const MIN: usize = 10;
    pub const MAX: usize = 5000;
    pub const DEFAULT: usize = 200;
}

/// Number of events kept, always within [`buffer_capacity_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

/// A generic circular buffer with fixed capacity.
///
/// When the buffer is full, pushing a new element evicts the oldest one.
/// Elements are stored in chronological order (oldest first).
///
/// # Example
///
/// ```
/// use orthoview::diagnostics::{BufferCapacity, CircularBuffer};
///
/// let mut buffer: CircularBuffer<i32> = CircularBuffer::new(BufferCapacity::default());
///
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
///
/// let items: Vec<_> = buffer.iter().copied().collect();
/// assert_eq!(items, vec![1, 2, 3]);
/// assert_eq!(buffer.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CircularBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> CircularBuffer<T> {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self::with_raw_capacity(capacity.value())
    }

    /// Creates a buffer with an unchecked capacity (at least 1). Meant for
    /// tests with small capacities.
    #[must_use]
    pub fn with_raw_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes an element to the buffer, evicting the oldest if at capacity.
    pub fn push(&mut self, item: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    /// Returns an iterator over the elements in chronological order (oldest first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.data.iter()
    }

    /// Most recent element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.data.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}
