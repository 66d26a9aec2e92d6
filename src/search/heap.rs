//! Binary min-heap of pending persons, keyed by search distance.
//!
//! Array-backed: index i's parent is (i−1)/2, children 2i+1 and 2i+2.
//! A person→slot side map keeps `decrease_distance` at O(log n). No
//! tie-break is guaranteed between equal distances.

use hashbrown::HashMap;

use crate::model::PersonId;

/// Distance of a person not yet reached from the source.
pub(crate) const UNREACHED: u64 = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeapEntry {
    pub person: PersonId,
    pub distance: u64,
}

pub(crate) struct MinHeap {
    entries: Vec<HeapEntry>,
    /// person → current slot in `entries`.
    slots: HashMap<PersonId, usize>,
}

impl MinHeap {
    /// Heap over every given person: the source at distance 0, everyone
    /// else at [`UNREACHED`]. Built bottom-up, last internal node first.
    pub fn build(persons: impl IntoIterator<Item = PersonId>, source: PersonId) -> MinHeap {
        let entries: Vec<HeapEntry> = persons
            .into_iter()
            .map(|person| HeapEntry {
                person,
                distance: if person == source { 0 } else { UNREACHED },
            })
            .collect();
        let slots = entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.person, slot))
            .collect();

        let mut heap = MinHeap { entries, slots };
        for i in (0..heap.entries.len() / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the entry with the smallest distance.
    pub fn extract_min(&mut self) -> Option<HeapEntry> {
        let last = self.entries.len().checked_sub(1)?;
        self.entries.swap(0, last);
        let min = self.entries.pop()?;
        self.slots.remove(&min.person);

        if let Some(first) = self.entries.first() {
            self.slots.insert(first.person, 0);
            self.sift_down(0);
        }
        Some(min)
    }

    /// Lowers a person's distance and restores heap order upward.
    /// Rejected (no mutation) unless the new distance is strictly smaller,
    /// or if the person has already been extracted.
    pub fn decrease_distance(&mut self, person: PersonId, new_distance: u64) -> bool {
        let Some(&slot) = self.slots.get(&person) else {
            return false;
        };
        if new_distance >= self.entries[slot].distance {
            return false;
        }
        self.entries[slot].distance = new_distance;
        self.sift_up(slot);
        true
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < self.entries.len()
                && self.entries[left].distance < self.entries[smallest].distance
            {
                smallest = left;
            }
            if right < self.entries.len()
                && self.entries[right].distance < self.entries[smallest].distance
            {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap_slots(i, smallest);
            i = smallest;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[parent].distance <= self.entries[i].distance {
                break;
            }
            self.swap_slots(i, parent);
            i = parent;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].person, a);
        self.slots.insert(self.entries[b].person, b);
    }
}

// ============================================================================
// Tests
// ============================================================================
