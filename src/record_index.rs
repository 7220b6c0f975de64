//! Issue index keyed by tracking id.
//!
//! The tree answers lookups and id-ordered listings directly. Urgency
//! listings snapshot every record into a fresh [`MinHeap`] per call instead
//! of maintaining a heap alongside the tree, so a ranking always reflects a
//! single in-order scan.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::config::{Backend, IndexConfig};
use crate::heap::MinHeap;
use crate::index::{AnyTree, OrderedIndex};
use crate::record::{Category, Status, TrackedRecord};
use crate::tracking;
use crate::urgency;

/// Tree type used when the backend is picked from configuration.
pub type RecordTree = AnyTree<String, Arc<TrackedRecord>>;

fn by_urgency(a: &Arc<TrackedRecord>, b: &Arc<TrackedRecord>) -> Ordering {
    urgency::compare(a, b)
}

/// Index over tracked records.
///
/// Single writer, many readers: `build`/`upsert` need `&mut self`, queries
/// only read. See [`SharedRecordIndex`](crate::SharedRecordIndex) for a
/// locked wrapper.
#[derive(Debug)]
pub struct RecordIndex<T = RecordTree> {
    tree: T,
    config: IndexConfig,
}

impl RecordIndex<RecordTree> {
    /// Empty index on the default (AVL) backend.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    pub fn with_backend(backend: Backend) -> Self {
        Self::with_config(IndexConfig {
            backend,
            ..IndexConfig::default()
        })
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            tree: AnyTree::new(config.backend),
            config,
        }
    }

    pub fn backend(&self) -> Backend {
        self.tree.backend()
    }
}

impl Default for RecordIndex<RecordTree> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordIndex<T>
where
    T: OrderedIndex<String, Arc<TrackedRecord>>,
{
    /// Wrap a concrete tree, e.g. `RecordIndex::with_tree(RbTree::new())`.
    pub fn with_tree(tree: T) -> Self {
        Self {
            tree,
            config: IndexConfig::default(),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Replace the whole index with `seed`.
    ///
    /// Records with a blank tracking id are skipped. A later record with the
    /// same id as an earlier one overwrites it.
    pub fn build<I>(&mut self, seed: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<TrackedRecord>>,
    {
        self.tree.clear();
        let mut skipped = 0usize;
        for record in seed {
            if !self.index_record(record.into()) {
                skipped += 1;
            }
        }
        debug!(indexed = self.tree.len(), skipped, "built record index");
    }

    /// Insert or replace one record. Returns `false` if it was skipped for a
    /// blank tracking id.
    pub fn upsert(&mut self, record: impl Into<Arc<TrackedRecord>>) -> bool {
        let record = record.into();
        let indexed = self.index_record(record);
        if !indexed {
            trace!("skipped record with blank tracking id");
        }
        indexed
    }

    fn index_record(&mut self, record: Arc<TrackedRecord>) -> bool {
        if !record.is_addressable() {
            return false;
        }
        let key = record.tracking_id.clone();
        match self.tree.upsert(key, record) {
            Ok(_) => true,
            Err(err) => {
                debug_assert!(false, "addressable tracking id rejected by the tree: {err}");
                false
            }
        }
    }

    /// Look a record up by tracking id. Blank ids are never found.
    pub fn get_by_id(&self, tracking_id: &str) -> Option<&Arc<TrackedRecord>> {
        if tracking_id.trim().is_empty() {
            return None;
        }
        self.tree.get(tracking_id)
    }

    /// Every record, ascending by tracking id.
    pub fn all_sorted_by_id(&self) -> impl Iterator<Item = &Arc<TrackedRecord>> + '_ {
        self.tree.in_order().map(|(_, record)| record)
    }

    /// Up to `k` records, most urgent first.
    ///
    /// The ranking is taken from a snapshot made when this is called; later
    /// upserts do not affect an iterator already returned.
    pub fn top_urgent(&self, k: usize) -> impl Iterator<Item = Arc<TrackedRecord>> {
        let mut heap = MinHeap::with_capacity(if k == 0 { 0 } else { self.tree.len() }, by_urgency);
        if k > 0 {
            heap.push_range(self.tree.in_order().map(|(_, record)| Arc::clone(record)));
        }
        trace!(k, snapshot = heap.len(), "ranking records by urgency");
        std::iter::from_fn(move || heap.try_pop()).take(k)
    }

    /// Next free tracking id for `category` on `date`, given the indexed records.
    pub fn next_tracking_id(&self, category: Category, date: NaiveDate) -> String {
        tracking::next_tracking_id(
            category,
            date,
            self.all_sorted_by_id().map(|r| r.tracking_id.as_str()),
        )
    }

    /// One page of a filtered listing.
    pub fn list(&self, query: &ListingQuery) -> Listing {
        let page = query.page.max(1);
        let requested = if query.page_size == 0 {
            self.config.default_page_size
        } else {
            query.page_size
        };
        let page_size = requested.clamp(1, self.config.max_page_size.max(1));

        let matching = match query.sort {
            SortOrder::TrackingId => query.filter(self.all_sorted_by_id().cloned()),
            SortOrder::Urgent => query.filter(self.top_urgent(self.tree.len())),
        };

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Listing {
            items,
            total,
            page,
            page_size,
        }
    }
}

/// Order of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Urgent,
    #[serde(alias = "id")]
    TrackingId,
}

/// Filters and paging for [`RecordIndex::list`].
///
/// `page` is 1-based; `0` is treated as `1`. A `page_size` of `0` means the
/// configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub sort: SortOrder,
    pub status: Option<Status>,
    pub category: Option<Category>,
    /// Case-insensitive substring of location, description or tracking id.
    pub search: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl ListingQuery {
    fn filter(&self, records: impl Iterator<Item = Arc<TrackedRecord>>) -> Vec<Arc<TrackedRecord>> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        records
            .filter(|r| self.status.map_or(true, |s| r.status == s))
            .filter(|r| self.category.map_or(true, |c| r.category == c))
            .filter(|r| match &needle {
                None => true,
                Some(n) => [&r.location, &r.description, &r.tracking_id]
                    .iter()
                    .any(|field| field.to_lowercase().contains(n.as_str())),
            })
            .collect()
    }
}

/// A page of records plus the size of the whole filtered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub items: Vec<Arc<TrackedRecord>>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}
