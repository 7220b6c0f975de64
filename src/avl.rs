//! Height-balanced (AVL) tree.
//!
//! Every node caches the height of its subtree (leaf = 1, missing child = 0).
//! After an insert, each node on the unwind path recomputes its height and
//! balance factor `height(left) - height(right)`. A factor outside `[-1, 1]`
//! is repaired by one single or one double rotation, chosen by comparing the
//! inserted key against the heavy child's key:
//!
//! ```text
//! balance > 1,  key < left.key   -> rotate right
//! balance > 1,  key > left.key   -> rotate left at left child, then right
//! balance < -1, key > right.key  -> rotate left
//! balance < -1, key < right.key  -> rotate right at right child, then left
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::error::IndexError;
use crate::index::node::{self, Link, Node};
use crate::index::{IndexKey, OrderedIndex};

/// In-order iterator for [`AvlTree`].
pub type Iter<'a, K, V> = node::Iter<'a, K, V, u8>;

type AvlNode<K, V> = Node<K, V, u8>;

/// Ordered map over an AVL tree.
pub struct AvlTree<K, V> {
    root: Link<K, V, u8>,
    len: usize,
}

#[inline]
fn height<K, V>(link: &Link<K, V, u8>) -> u8 {
    link.as_ref().map_or(0, |n| n.meta)
}

#[inline]
fn fix_height<K, V>(node: &mut AvlNode<K, V>) {
    node.meta = height(&node.left).max(height(&node.right)) + 1;
}

#[inline]
fn balance<K, V>(node: &AvlNode<K, V>) -> i16 {
    i16::from(height(&node.left)) - i16::from(height(&node.right))
}

fn rotate_right<K, V>(mut y: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut x) = y.left.take() else {
        debug_assert!(false, "rotate_right needs a left child");
        return y;
    };
    y.left = x.right.take();
    fix_height(&mut y);
    x.right = Some(y);
    fix_height(&mut x);
    x
}

fn rotate_left<K, V>(mut x: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut y) = x.right.take() else {
        debug_assert!(false, "rotate_left needs a right child");
        return x;
    };
    x.right = y.left.take();
    fix_height(&mut x);
    y.left = Some(x);
    fix_height(&mut y);
    y
}

/// Recursive insert. Recursion depth is bounded by the tree height, which the
/// balance invariant keeps at `O(log n)`.
///
/// Returns the (possibly new) subtree root and the replaced value, if any.
fn insert<K: Ord, V>(link: Link<K, V, u8>, key: K, value: V) -> (Box<AvlNode<K, V>>, Option<V>) {
    let Some(mut node) = link else {
        return (Node::leaf(key, value, 1), None);
    };

    // Side of the heavy child the new key lands on; captured before `key` moves.
    let grandchild_side;
    match key.cmp(&node.key) {
        Ordering::Less => {
            grandchild_side = node.left.as_ref().map(|l| key.cmp(&l.key));
            let (child, old) = insert(node.left.take(), key, value);
            node.left = Some(child);
            if old.is_some() {
                return (node, old);
            }
        }
        Ordering::Greater => {
            grandchild_side = node.right.as_ref().map(|r| key.cmp(&r.key));
            let (child, old) = insert(node.right.take(), key, value);
            node.right = Some(child);
            if old.is_some() {
                return (node, old);
            }
        }
        Ordering::Equal => {
            let old = std::mem::replace(&mut node.value, value);
            return (node, Some(old));
        }
    }

    fix_height(&mut node);
    let b = balance(&node);

    let node = match (b, grandchild_side) {
        (2.., Some(Ordering::Less)) => rotate_right(node),
        (2.., Some(Ordering::Greater)) => {
            node.left = node.left.take().map(rotate_left);
            rotate_right(node)
        }
        (..=-2, Some(Ordering::Greater)) => rotate_left(node),
        (..=-2, Some(Ordering::Less)) => {
            node.right = node.right.take().map(rotate_right);
            rotate_left(node)
        }
        _ => node,
    };
    debug_assert!(
        (-1..=1).contains(&balance(&node)),
        "AVL balance must be restored after rotation"
    );
    (node, None)
}

impl<K, V> AvlTree<K, V> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Height of the tree; `0` when empty.
    pub fn height(&self) -> usize {
        usize::from(height(&self.root))
    }
}

impl<K: IndexKey, V> OrderedIndex<K, V> for AvlTree<K, V> {
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
        let (root, old) = insert(self.root.take(), key, value);
        self.root = Some(root);
        if old.is_none() {
            self.len += 1;
        }
        Ok(old)
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

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for AvlTree<K, V> {
    fn drop(&mut self) {
        node::dismantle(self.root.take());
    }
}

impl<K: IndexKey + std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.in_order()).finish()
    }
}

#[cfg(test)]
impl<K: Ord, V> AvlTree<K, V> {
    /// Check ordering, cached heights and balance for every node.
    pub(crate) fn validate(&self) {
        fn check<K: Ord, V>(link: &Link<K, V, u8>, lo: Option<&K>, hi: Option<&K>) -> (u8, usize) {
            let Some(node) = link else {
                return (0, 0);
            };
            if let Some(lo) = lo {
                assert!(lo < &node.key, "key must exceed every key in the left subtree above it");
            }
            if let Some(hi) = hi {
                assert!(&node.key < hi, "key must precede every key in the right subtree above it");
            }
            let (lh, lc) = check(&node.left, lo, Some(&node.key));
            let (rh, rc) = check(&node.right, Some(&node.key), hi);
            assert_eq!(node.meta, lh.max(rh) + 1, "stored height must match children");
            assert!(
                (i16::from(lh) - i16::from(rh)).abs() <= 1,
                "height imbalance must not exceed 1"
            );
            (node.meta, lc + rc + 1)
        }

        let (_, count) = check(&self.root, None, None);
        assert_eq!(count, self.len, "reachable node count must match len");
    }
}
