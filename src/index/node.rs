//! Box-linked node shared by the unbalanced and AVL backends.
//!
//! `M` is the backend's per-node metadata: `()` for the unbalanced tree, the
//! cached subtree height for AVL.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FusedIterator;

pub(crate) type Link<K, V, M> = Option<Box<Node<K, V, M>>>;

pub(crate) struct Node<K, V, M> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V, M>,
    pub(crate) right: Link<K, V, M>,
    pub(crate) meta: M,
}

impl<K, V, M> Node<K, V, M> {
    pub(crate) fn leaf(key: K, value: V, meta: M) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
            meta,
        })
    }
}

/// Point lookup by descending left/right on each comparison.
pub(crate) fn find<'a, K, V, M, Q>(mut link: &'a Link<K, V, M>, key: &Q) -> Option<&'a V>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    while let Some(node) = link {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => link = &node.left,
            Ordering::Greater => link = &node.right,
            Ordering::Equal => return Some(&node.value),
        }
    }
    None
}

/// Tear a subtree down without recursing.
///
/// The default `Drop` of a `Box` chain recurses once per level, which
/// overflows the stack on a list-shaped unbalanced tree.
pub(crate) fn dismantle<K, V, M>(root: Link<K, V, M>) {
    let mut stack: Vec<Box<Node<K, V, M>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

/// Stack-based in-order iterator over a Box-linked tree.
pub struct Iter<'a, K, V, M> {
    stack: Vec<&'a Node<K, V, M>>,
    remaining: usize,
}

impl<'a, K, V, M> Iter<'a, K, V, M> {
    pub(crate) fn new(root: &'a Link<K, V, M>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V, M>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, V, M> Iterator for Iter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, M> ExactSizeIterator for Iter<'_, K, V, M> {}

impl<K, V, M> FusedIterator for Iter<'_, K, V, M> {}

impl<K, V, M> Clone for Iter<'_, K, V, M> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}
