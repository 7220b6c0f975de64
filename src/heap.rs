//! Binary min-heap with an injected comparison.
//!
//! The comparator must be a consistent total order; the heap keeps
//! `cmp(parent(i), i) != Greater` for every non-root slot `i`.

use std::cmp::Ordering;

use crate::error::IndexError;

/// Binary min-heap ordered by `F`.
pub struct MinHeap<T, F> {
    items: Vec<T>,
    cmp: F,
}

impl<T, F> MinHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(cmp: F) -> Self {
        Self {
            items: Vec::new(),
            cmp,
        }
    }

    pub fn with_capacity(capacity: usize, cmp: F) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            cmp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Append every item, then restore the heap with one bottom-up pass.
    ///
    /// This is `O(n)` for the whole batch, against `O(n log n)` for pushing
    /// the items one at a time.
    pub fn push_range<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.items.extend(items);
        self.heapify();
    }

    /// Remove and return the smallest item.
    pub fn pop(&mut self) -> Result<T, IndexError> {
        self.try_pop().ok_or(IndexError::EmptyHeap)
    }

    pub fn try_pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// The smallest item, without removing it.
    pub fn peek(&self) -> Result<&T, IndexError> {
        self.try_peek().ok_or(IndexError::EmptyHeap)
    }

    pub fn try_peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Pop everything, smallest first.
    pub fn drain_sorted(&mut self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.try_pop())
    }

    fn heapify(&mut self) {
        for i in (0..self.items.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if (self.cmp)(&self.items[i], &self.items[parent]) != Ordering::Less {
                break;
            }
            self.items.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && (self.cmp)(&self.items[left], &self.items[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < n && (self.cmp)(&self.items[right], &self.items[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.items.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T, F> Extend<T> for MinHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push_range(iter);
    }
}

impl<T: std::fmt::Debug, F> std::fmt::Debug for MinHeap<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinHeap").field("items", &self.items).finish()
    }
}

#[cfg(test)]
impl<T, F> MinHeap<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub(crate) fn validate(&self) {
        for i in 1..self.items.len() {
            let parent = (i - 1) / 2;
            assert_ne!(
                (self.cmp)(&self.items[parent], &self.items[i]),
                Ordering::Greater,
                "parent must not compare greater than child (slot {i})"
            );
        }
    }
}
