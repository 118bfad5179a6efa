//! Min-priority frontier of cells waiting to be colored
//!
//! A binary heap ordered by priority, then by insertion order, so the
//! lowest priority pops first and equal priorities pop first-in first-out.
//! The same coordinate may be queued more than once; the fill mask
//! discards stale entries at pop time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::Coord;

#[derive(Clone, Copy, Debug)]
struct Entry {
    priority: f64,
    sequence: u64,
    coord: Coord,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap yields the smallest priority, oldest first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Growth frontier keyed by floating point priority
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    next_sequence: u64,
}

impl Frontier {
    /// Create an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty frontier with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Queue a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if `priority` is NaN
    pub fn push(&mut self, coord: Coord, priority: f64) -> Result<()> {
        if priority.is_nan() {
            return Err(invalid_parameter(
                "priority",
                &priority,
                &"frontier priorities must not be NaN",
            ));
        }
        self.heap.push(Entry {
            priority,
            sequence: self.next_sequence,
            coord,
        });
        self.next_sequence += 1;
        Ok(())
    }

    /// Remove and return the coordinate with the minimum priority
    pub fn pop(&mut self) -> Option<Coord> {
        self.heap.pop().map(|entry| entry.coord)
    }

    /// Minimum priority currently queued
    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.priority)
    }

    /// Number of queued entries, duplicates included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Test if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
