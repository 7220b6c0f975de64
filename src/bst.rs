//! Unbalanced binary search tree.
//!
//! Inserts descend by comparison and hang a new leaf where the walk falls off
//! the tree. Nothing is ever rebalanced, so strictly increasing keys degrade
//! the tree into a list of height `n`. That is accepted for this backend;
//! pick [`AvlTree`](crate::AvlTree) or [`RbTree`](crate::RbTree) when the
//! insertion order may be adversarial.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::error::IndexError;
use crate::index::node::{self, Link, Node};
use crate::index::{IndexKey, OrderedIndex};

/// In-order iterator for [`BstTree`].
pub type Iter<'a, K, V> = node::Iter<'a, K, V, ()>;

/// Ordered map over a plain binary search tree.
pub struct BstTree<K, V> {
    root: Link<K, V, ()>,
    len: usize,
}

impl<K, V> BstTree<K, V> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Height of the tree; `0` when empty, `1` for a single leaf.
    ///
    /// Computed with an explicit stack so list-shaped trees are fine.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(&Node<K, V, ()>, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        max
    }
}

impl<K: IndexKey, V> OrderedIndex<K, V> for BstTree<K, V> {
    type Iter<'a>
        = Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn upsert(&mut self, key: K, value: V) -> Result<Option<V>, IndexError> {
        if key.is_absent() {
            return Err(IndexError::InvalidKey);
        }

        let mut link = &mut self.root;
        while let Some(node) = link {
            match key.cmp(&node.key) {
                Ordering::Less => link = &mut node.left,
                Ordering::Greater => link = &mut node.right,
                Ordering::Equal => return Ok(Some(std::mem::replace(&mut node.value, value))),
            }
        }

        *link = Some(Node::leaf(key, value, ()));
        self.len += 1;
        Ok(None)
    }

    fn try_get<Q>(&self, key: &Q) -> Result<Option<&V>, IndexError>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        if key.is_absent() {
            return Err(IndexError::InvalidKey);
        }
        Ok(node::find(&self.root, key))
    }

    fn in_order(&self) -> Self::Iter<'_> {
        Iter::new(&self.root, self.len)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        node::dismantle(self.root.take());
        self.len = 0;
    }
}

impl<K, V> Default for BstTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for BstTree<K, V> {
    fn drop(&mut self) {
        node::dismantle(self.root.take());
    }
}

impl<K: IndexKey + std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for BstTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.in_order()).finish()
    }
}

#[cfg(test)]
impl<K: Ord, V> BstTree<K, V> {
    /// Walk every node checking strict key order; returns the node count.
    pub(crate) fn validate(&self) -> usize {
        let mut count = 0;
        let mut prev: Option<&K> = None;
        for (key, _) in Iter::new(&self.root, self.len) {
            if let Some(p) = prev {
                assert!(p < key, "in-order keys must be strictly ascending");
            }
            prev = Some(key);
            count += 1;
        }
        assert_eq!(count, self.len, "reachable node count must match len");
        count
    }

    /// Pre-order key sequence, used to compare tree shapes.
    pub(crate) fn shape(&self) -> Vec<&K> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node<K, V, ()>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(&node.key);
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut t: BstTree<String, u64> = BstTree::new();
        t.upsert("hello".to_string(), 1).unwrap();
        t.upsert("world".to_string(), 2).unwrap();
        assert_eq!(t.get(&"hello".to_string()), Some(&1));
        assert_eq!(t.get(&"world".to_string()), Some(&2));
        assert_eq!(t.get(&"missing".to_string()), None);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_update_keeps_shape() {
        let mut t: BstTree<u32, &str> = BstTree::new();
        for k in [50, 30, 70, 20, 40, 60, 80] {
            t.upsert(k, "first").unwrap();
        }
        let before: Vec<u32> = t.shape().into_iter().copied().collect();

        assert_eq!(t.upsert(40, "second").unwrap(), Some("first"));
        let after: Vec<u32> = t.shape().into_iter().copied().collect();

        assert_eq!(before, after);
        assert_eq!(t.len(), 7);
        assert_eq!(t.get(&40), Some(&"second"));
    }

    #[test]
    fn test_absent_key_rejected() {
        let mut t: BstTree<String, u64> = BstTree::new();
        assert_eq!(t.upsert(String::new(), 1), Err(IndexError::InvalidKey));
        assert_eq!(t.try_get(&String::new()), Err(IndexError::InvalidKey));
        assert_eq!(t.get(&String::new()), None);
        assert!(t.is_empty());
    }

    #[test]
    fn test_in_order_is_sorted_and_restartable() {
        let mut t: BstTree<u32, u32> = BstTree::new();
        for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
            t.upsert(k, k * 10).unwrap();
        }
        let first: Vec<u32> = t.in_order().map(|(k, _)| *k).collect();
        let second: Vec<u32> = t.in_order().map(|(k, _)| *k).collect();
        assert_eq!(first, (1..=9).collect::<Vec<_>>());
        assert_eq!(first, second);
        assert_eq!(t.in_order().len(), 9);
        t.validate();
    }

    #[test]
    fn test_sorted_insert_degenerates_without_overflow() {
        // Strictly increasing keys build a list; traversal and drop must not recurse.
        let mut t: BstTree<u32, ()> = BstTree::new();
        for k in 0..20_000u32 {
            t.upsert(k, ()).unwrap();
        }
        assert_eq!(t.height(), 20_000);
        assert_eq!(t.in_order().count(), 20_000);
        assert_eq!(t.get(&19_999), Some(&()));
    }

    #[test]
    fn test_clear() {
        let mut t: BstTree<u32, u32> = BstTree::new();
        for k in 0..10 {
            t.upsert(k, k).unwrap();
        }
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.in_order().next(), None);
        assert_eq!(t.upsert(3, 3).unwrap(), None);
        assert_eq!(t.len(), 1);
    }
}
