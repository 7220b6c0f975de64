//! Runtime backend selection.

use std::borrow::Borrow;

use crate::avl::{self, AvlTree};
use crate::bst::{self, BstTree};
use crate::config::Backend;
use crate::error::IndexError;
use crate::index::{IndexKey, OrderedIndex};
use crate::rbtree::{self, RbTree};

/// One of the three tree backends, chosen at construction time.
pub enum AnyTree<K, V> {
    Unbalanced(BstTree<K, V>),
    Avl(AvlTree<K, V>),
    RedBlack(RbTree<K, V>),
}

impl<K, V> AnyTree<K, V> {
    pub fn new(backend: Backend) -> Self {
        match backend {
            Backend::Unbalanced => Self::Unbalanced(BstTree::new()),
            Backend::Avl => Self::Avl(AvlTree::new()),
            Backend::RedBlack => Self::RedBlack(RbTree::new()),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::Unbalanced(_) => Backend::Unbalanced,
            Self::Avl(_) => Backend::Avl,
            Self::RedBlack(_) => Backend::RedBlack,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Unbalanced(t) => t.height(),
            Self::Avl(t) => t.height(),
            Self::RedBlack(t) => t.height(),
        }
    }
}

impl<K, V> Default for AnyTree<K, V> {
    fn default() -> Self {
        Self::new(Backend::default())
    }
}

/// In-order iterator for [`AnyTree`].
pub enum AnyIter<'a, K, V> {
    Unbalanced(bst::Iter<'a, K, V>),
    Avl(avl::Iter<'a, K, V>),
    RedBlack(rbtree::Iter<'a, K, V>),
}

impl<'a, K, V> Iterator for AnyIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Unbalanced(it) => it.next(),
            Self::Avl(it) => it.next(),
            Self::RedBlack(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Unbalanced(it) => it.size_hint(),
            Self::Avl(it) => it.size_hint(),
            Self::RedBlack(it) => it.size_hint(),
        }
    }
}

impl<K, V> ExactSizeIterator for AnyIter<'_, K, V> {}

impl<K: IndexKey, V> OrderedIndex<K, V> for AnyTree<K, V> {
    type Iter<'a>
        = AnyIter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn upsert(&mut self, key: K, value: V) -> Result<Option<V>, IndexError> {
        match self {
            Self::Unbalanced(t) => t.upsert(key, value),
            Self::Avl(t) => t.upsert(key, value),
            Self::RedBlack(t) => t.upsert(key, value),
        }
    }

    fn try_get<Q>(&self, key: &Q) -> Result<Option<&V>, IndexError>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        match self {
            Self::Unbalanced(t) => t.try_get(key),
            Self::Avl(t) => t.try_get(key),
            Self::RedBlack(t) => t.try_get(key),
        }
    }

    fn in_order(&self) -> Self::Iter<'_> {
        match self {
            Self::Unbalanced(t) => AnyIter::Unbalanced(t.in_order()),
            Self::Avl(t) => AnyIter::Avl(t.in_order()),
            Self::RedBlack(t) => AnyIter::RedBlack(t.in_order()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Unbalanced(t) => t.len(),
            Self::Avl(t) => t.len(),
            Self::RedBlack(t) => t.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Unbalanced(t) => t.clear(),
            Self::Avl(t) => t.clear(),
            Self::RedBlack(t) => t.clear(),
        }
    }
}

impl<K: IndexKey + std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for AnyTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.in_order()).finish()
    }
}
