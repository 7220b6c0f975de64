//! # issue-index
//!
//! In-memory ordered index for tracked issue records, with interchangeable
//! tree backends and urgency ranking.
//!
//! - [`OrderedIndex`]: the key → value contract (upsert, lookup, in-order walk)
//! - [`BstTree`], [`AvlTree`], [`RbTree`]: unbalanced, height-balanced and
//!   red-black implementations; [`AnyTree`] picks one at runtime
//! - [`MinHeap`]: binary min-heap with an injected comparator and `O(n)` bulk load
//! - [`urgency`]: the total order used to rank records
//! - [`RecordIndex`]: records keyed by tracking id, plus top-K by urgency
//! - [`workflow`]: status transition legality by graph reachability
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use issue_index::{Backend, Category, RecordIndex, Status, TrackedRecord};
//!
//! let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
//! let mut index = RecordIndex::with_backend(Backend::RedBlack);
//! index.build(vec![
//!     TrackedRecord::new("MC-WT-20250101-0002", Status::Resolved, t0, Category::Water),
//!     TrackedRecord::new("MC-RD-20250101-0001", Status::Submitted, t0, Category::Roads),
//! ]);
//!
//! let first = index.all_sorted_by_id().next().unwrap();
//! assert_eq!(first.tracking_id, "MC-RD-20250101-0001");
//!
//! let urgent: Vec<_> = index.top_urgent(1).collect();
//! assert_eq!(urgent[0].status, Status::Submitted);
//!
//! assert!(issue_index::is_legal_transition(Status::Submitted, Status::Closed));
//! ```
//!
//! The index is single-writer / many-reader and takes no locks itself;
//! [`SharedRecordIndex`] wraps it in an `RwLock` for threaded hosts.

#![forbid(unsafe_code)]

pub mod avl;
pub mod bst;
pub mod config;
pub mod error;
pub mod heap;
pub mod index;
pub mod rbtree;
pub mod record;
pub mod record_index;
pub mod shared;
pub mod tracking;
pub mod urgency;
pub mod workflow;

pub use avl::AvlTree;
pub use bst::BstTree;
pub use config::{Backend, IndexConfig, ParseBackendError};
pub use error::IndexError;
pub use heap::MinHeap;
pub use index::{AnyIter, AnyTree, IndexKey, OrderedIndex};
pub use rbtree::RbTree;
pub use record::{Category, Status, TrackedRecord};
pub use record_index::{Listing, ListingQuery, RecordIndex, RecordTree, SortOrder};
pub use shared::SharedRecordIndex;
pub use tracking::next_tracking_id;
pub use workflow::{is_legal_transition, Graph};

#[cfg(test)]
mod proptests;
