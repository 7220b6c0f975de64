//! Red-black tree with arena-allocated nodes.
//!
//! Insert fix-up walks upward, so each node records its parent. Nodes live in
//! a `Vec` and refer to each other by [`NodeId`]; the parent link is just an
//! index and never owns anything, which keeps ownership acyclic.
//!
//! Invariants after every upsert:
//! 1. the root is black;
//! 2. no red node has a red child;
//! 3. every path from a node down to a missing child crosses the same number
//!    of black nodes.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::error::IndexError;
use crate::index::{IndexKey, OrderedIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

/// Index of a node in the arena.
///
/// `NodeId::NIL` stands in for a missing child/parent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeId(usize);

impl NodeId {
    const NIL: NodeId = NodeId(usize::MAX);

    #[inline]
    fn is_nil(self) -> bool {
        self == Self::NIL
    }
}

#[derive(Clone)]
struct RbNode<K, V> {
    key: K,
    value: V,
    left: NodeId,
    right: NodeId,
    parent: NodeId,
    color: Color,
}

/// Ordered map over a red-black tree.
#[derive(Clone)]
pub struct RbTree<K, V> {
    nodes: Vec<RbNode<K, V>>,
    root: NodeId,
}

impl<K, V> RbTree<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId::NIL,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: NodeId::NIL,
        }
    }

    /// Height of the tree; `0` when empty.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack = Vec::new();
        if !self.root.is_nil() {
            stack.push((self.root, 1));
        }
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            for child in [self.left(id), self.right(id)] {
                if !child.is_nil() {
                    stack.push((child, depth + 1));
                }
            }
        }
        max
    }

    // Accessors treat NIL as a black leaf with no links.

    #[inline]
    fn node(&self, id: NodeId) -> &RbNode<K, V> {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut RbNode<K, V> {
        &mut self.nodes[id.0]
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        if id.is_nil() {
            Color::Black
        } else {
            self.node(id).color
        }
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        if !id.is_nil() {
            self.node_mut(id).color = color;
        }
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            NodeId::NIL
        } else {
            self.node(id).parent
        }
    }

    #[inline]
    fn left(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            NodeId::NIL
        } else {
            self.node(id).left
        }
    }

    #[inline]
    fn right(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            NodeId::NIL
        } else {
            self.node(id).right
        }
    }

    fn alloc(&mut self, node: RbNode<K, V>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Replace `old` with `new` in `old`'s parent (or at the root).
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_nil() {
            self.root = new;
        } else if self.left(parent) == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.right(x);
        debug_assert!(!y.is_nil(), "rotate_left needs a right child");
        if y.is_nil() {
            return;
        }

        let y_left = self.left(y);
        self.node_mut(x).right = y_left;
        if !y_left.is_nil() {
            self.node_mut(y_left).parent = x;
        }

        let xp = self.parent(x);
        self.node_mut(y).parent = xp;
        self.replace_child(xp, x, y);

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.left(x);
        debug_assert!(!y.is_nil(), "rotate_right needs a left child");
        if y.is_nil() {
            return;
        }

        let y_right = self.right(y);
        self.node_mut(x).left = y_right;
        if !y_right.is_nil() {
            self.node_mut(y_right).parent = x;
        }

        let xp = self.parent(x);
        self.node_mut(y).parent = xp;
        self.replace_child(xp, x, y);

        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;
    }

    /// Restore the color rules after `z` was linked in as a red leaf.
    fn fix_insert(&mut self, mut z: NodeId) {
        loop {
            let p = self.parent(z);
            if p.is_nil() || self.color(p) == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let gp = self.parent(p);
            if gp.is_nil() {
                break;
            }

            if p == self.left(gp) {
                let uncle = self.right(gp);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(gp, Color::Red);
                    z = gp;
                } else {
                    if z == self.right(p) {
                        // Inner child: turn it into the outer case first.
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    self.set_color(p, Color::Black);
                    self.set_color(gp, Color::Red);
                    self.rotate_right(gp);
                }
            } else {
                let uncle = self.left(gp);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(gp, Color::Red);
                    z = gp;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    self.set_color(p, Color::Black);
                    self.set_color(gp, Color::Red);
                    self.rotate_left(gp);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }
}

impl<K: IndexKey, V> OrderedIndex<K, V> for RbTree<K, V> {
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

        let mut parent = NodeId::NIL;
        let mut cur = self.root;
        let mut went_left = false;
        while !cur.is_nil() {
            parent = cur;
            match key.cmp(&self.node(cur).key) {
                Ordering::Less => {
                    went_left = true;
                    cur = self.node(cur).left;
                }
                Ordering::Greater => {
                    went_left = false;
                    cur = self.node(cur).right;
                }
                Ordering::Equal => {
                    let old = std::mem::replace(&mut self.node_mut(cur).value, value);
                    return Ok(Some(old));
                }
            }
        }

        let z = self.alloc(RbNode {
            key,
            value,
            left: NodeId::NIL,
            right: NodeId::NIL,
            parent,
            color: Color::Red,
        });
        if parent.is_nil() {
            self.root = z;
        } else if went_left {
            self.node_mut(parent).left = z;
        } else {
            self.node_mut(parent).right = z;
        }

        self.fix_insert(z);
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
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.node(cur);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cur = node.left,
                Ordering::Greater => cur = node.right,
                Ordering::Equal => return Ok(Some(&node.value)),
            }
        }
        Ok(None)
    }

    fn in_order(&self) -> Self::Iter<'_> {
        Iter::new(self)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId::NIL;
    }
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey + std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for RbTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.in_order()).finish()
    }
}

/// In-order iterator for [`RbTree`].
pub struct Iter<'a, K, V> {
    tree: &'a RbTree<K, V>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(tree: &'a RbTree<K, V>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            remaining: tree.nodes.len(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut id: NodeId) {
        while !id.is_nil() {
            self.stack.push(id);
            id = self.tree.node(id).left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.push_left_spine(node.right);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
impl<K: Ord, V> RbTree<K, V> {
    /// Check ordering, parent links and all three color rules.
    ///
    /// Returns the black height of the root.
    pub(crate) fn validate(&self) -> usize {
        assert_eq!(self.color(self.root), Color::Black, "root must be black");
        if !self.root.is_nil() {
            assert!(self.parent(self.root).is_nil(), "root must have no parent");
        }

        let mut reachable = 0usize;
        let black_height = self.check(self.root, None, None, &mut reachable);
        assert_eq!(reachable, self.nodes.len(), "every arena node must be reachable");
        black_height
    }

    fn check(&self, id: NodeId, lo: Option<&K>, hi: Option<&K>, reachable: &mut usize) -> usize {
        if id.is_nil() {
            return 1;
        }
        *reachable += 1;
        let node = self.node(id);
        if let Some(lo) = lo {
            assert!(lo < &node.key, "left-subtree keys must be smaller");
        }
        if let Some(hi) = hi {
            assert!(&node.key < hi, "right-subtree keys must be larger");
        }
        for child in [node.left, node.right] {
            if !child.is_nil() {
                assert_eq!(self.parent(child), id, "child must point back at its parent");
                if node.color == Color::Red {
                    assert_eq!(self.color(child), Color::Black, "red node must not have a red child");
                }
            }
        }

        let lb = self.check(node.left, lo, Some(&node.key), reachable);
        let rb = self.check(node.right, Some(&node.key), hi, reachable);
        assert_eq!(lb, rb, "black height must match on both sides");
        lb + usize::from(node.color == Color::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut t: RbTree<String, u64> = RbTree::new();
        t.upsert("hello".to_string(), 1).unwrap();
        t.upsert("world".to_string(), 2).unwrap();
        assert_eq!(t.get(&"hello".to_string()), Some(&1));
        assert_eq!(t.get(&"world".to_string()), Some(&2));
        assert_eq!(t.get(&"missing".to_string()), None);
        assert_eq!(t.len(), 2);
        t.validate();
    }

    #[test]
    fn test_root_is_black() {
        let mut t: RbTree<u32, ()> = RbTree::new();
        t.upsert(1, ()).unwrap();
        assert_eq!(t.color(t.root), Color::Black);
        assert_eq!(t.validate(), 2);
    }

    #[test]
    fn test_recolor_case() {
        // 2 black with red children 1 and 3; inserting 4 recolors both children
        // black and leaves the root black.
        let mut t: RbTree<u32, ()> = RbTree::new();
        for k in [2, 1, 3, 4] {
            t.upsert(k, ()).unwrap();
            t.validate();
        }
        assert_eq!(t.color(t.root), Color::Black);
        let one = t.left(t.root);
        let three = t.right(t.root);
        assert_eq!(t.color(one), Color::Black);
        assert_eq!(t.color(three), Color::Black);
        assert_eq!(t.color(t.right(three)), Color::Red);
    }

    #[test]
    fn test_inner_child_rotations() {
        for order in [[3u32, 1, 2], [1, 3, 2]] {
            let mut t: RbTree<u32, ()> = RbTree::new();
            for k in order {
                t.upsert(k, ()).unwrap();
            }
            t.validate();
            assert_eq!(t.node(t.root).key, 2);
            assert_eq!(t.height(), 2);
        }
    }

    #[test]
    fn test_sorted_insert_stays_logarithmic() {
        let mut t: RbTree<u32, u32> = RbTree::new();
        for k in 0..100_000u32 {
            t.upsert(k, k).unwrap();
        }
        t.validate();
        // 2 * log2(n + 1)
        assert!(t.height() <= 34, "height {} too large", t.height());
        assert!(t.in_order().map(|(k, _)| *k).eq(0..100_000));
    }

    #[test]
    fn test_update_does_not_allocate() {
        let mut t: RbTree<u32, u32> = RbTree::new();
        for k in 0..16 {
            t.upsert(k, k).unwrap();
        }
        assert_eq!(t.upsert(5, 500).unwrap(), Some(5));
        assert_eq!(t.len(), 16);
        assert_eq!(t.nodes.len(), 16);
        assert_eq!(t.get(&5), Some(&500));
        t.validate();
    }

    #[test]
    fn test_absent_key_rejected() {
        let mut t: RbTree<&str, u32> = RbTree::new();
        assert_eq!(t.upsert("", 1), Err(IndexError::InvalidKey));
        assert!(t.is_empty());
        assert_eq!(t.try_get(""), Err(IndexError::InvalidKey));
    }
}
