//! The ordered-index contract shared by every tree backend.
//!
//! A backend maps unique keys to values, supports upsert and point lookup, and
//! walks its entries in strictly ascending key order. Three backends implement
//! the contract:
//!
//! - [`BstTree`](crate::BstTree): plain binary search tree, no rebalancing
//! - [`AvlTree`](crate::AvlTree): height-balanced, at most one (double) rotation per insert
//! - [`RbTree`](crate::RbTree): red-black, recolor + rotate fix-up with parent back-pointers
//!
//! [`AnyTree`] picks one of them at runtime from a [`Backend`](crate::Backend).

mod any;
pub(crate) mod node;

pub use any::{AnyIter, AnyTree};

use std::borrow::Borrow;

use crate::error::IndexError;

/// Keys that may be stored in an [`OrderedIndex`].
///
/// Some key types reserve a value meaning "no key" (an empty tracking id, a
/// `None`). Such keys are rejected with [`IndexError::InvalidKey`] before any
/// descent starts, so a failed upsert never leaves a partial mutation behind.
pub trait IndexKey: Ord {
    /// Whether this key is the absent sentinel for its type.
    fn is_absent(&self) -> bool {
        false
    }
}

impl IndexKey for String {
    fn is_absent(&self) -> bool {
        self.is_empty()
    }
}

impl IndexKey for str {
    fn is_absent(&self) -> bool {
        self.is_empty()
    }
}

impl IndexKey for &str {
    fn is_absent(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Ord> IndexKey for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

macro_rules! never_absent {
    ($($t:ty),* $(,)?) => {
        $(impl IndexKey for $t {})*
    };
}

never_absent!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char);

/// An ordered key → value mapping.
///
/// Keys are unique: upserting an existing key overwrites its value in place and
/// never creates a second node. Backends never remove entries.
pub trait OrderedIndex<K: IndexKey, V> {
    /// In-order iterator over `(key, value)` pairs.
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Insert `key`, or overwrite its value if already present.
    ///
    /// Returns the previous value on overwrite.
    fn upsert(&mut self, key: K, value: V) -> Result<Option<V>, IndexError>;

    /// Point lookup. A key that is simply not present is `Ok(None)`.
    ///
    /// As with `BTreeMap`, any borrowed form of `K` may be used, provided its
    /// ordering matches the ordering of `K`.
    fn try_get<Q>(&self, key: &Q) -> Result<Option<&V>, IndexError>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized;

    /// Like [`try_get`](Self::try_get), reporting an invalid key as not-found.
    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.try_get(key).ok().flatten()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Walk all entries in strictly ascending key order.
    ///
    /// Uses an explicit stack, so degenerate (list-shaped) trees are safe to
    /// traverse. Each call starts a fresh walk.
    fn in_order(&self) -> Self::Iter<'_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    fn clear(&mut self);
}
