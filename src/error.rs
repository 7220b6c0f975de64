//! Error taxonomy for the index, heap and record layers.

/// Failures surfaced by index and heap operations.
///
/// Both variants indicate a caller bug; nothing here is retried or absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The key is the absent sentinel for its type (see [`IndexKey`](crate::IndexKey)).
    #[error("invalid key: absent keys cannot be stored or looked up")]
    InvalidKey,

    /// `pop`/`peek` on a heap with no elements.
    #[error("heap is empty")]
    EmptyHeap,
}
