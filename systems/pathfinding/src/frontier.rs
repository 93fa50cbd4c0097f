//! Min-priority queue used by the best-first searches.

use std::{cmp::Ordering, collections::BinaryHeap};

use imla_core::Point;

/// Frontier ordered by ascending priority, then by insertion order.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    next_sequence: u64,
}

impl Frontier {
    pub(crate) fn push(&mut self, point: Point, cost: f32, priority: f32) {
        self.heap.push(Entry {
            priority,
            sequence: self.next_sequence,
            cost,
            point,
        });
        self.next_sequence = self.next_sequence.wrapping_add(1);
    }

    /// Pops the cheapest point together with the cost it was queued with.
    pub(crate) fn pop(&mut self) -> Option<(Point, f32)> {
        self.heap.pop().map(|entry| (entry.point, entry.cost))
    }
}

#[derive(Debug)]
struct Entry {
    priority: f32,
    sequence: u64,
    cost: f32,
    point: Point,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the smallest priority pops first.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}
