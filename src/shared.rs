//! Lock-guarded [`RecordIndex`] for multi-threaded hosts.
//!
//! Writers are serialized by the write lock; readers share the read lock and
//! get owned snapshots back, so no guard escapes a call.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::config::IndexConfig;
use crate::record::{Category, TrackedRecord};
use crate::record_index::{Listing, ListingQuery, RecordIndex};

/// A [`RecordIndex`] behind a `parking_lot::RwLock`.
pub struct SharedRecordIndex {
    inner: RwLock<RecordIndex>,
}

impl SharedRecordIndex {
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            inner: RwLock::new(RecordIndex::with_config(config)),
        }
    }

    pub fn build<I>(&self, seed: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<TrackedRecord>>,
    {
        self.inner.write().build(seed);
    }

    pub fn upsert(&self, record: impl Into<Arc<TrackedRecord>>) -> bool {
        self.inner.write().upsert(record)
    }

    pub fn get_by_id(&self, tracking_id: &str) -> Option<Arc<TrackedRecord>> {
        self.inner.read().get_by_id(tracking_id).cloned()
    }

    pub fn all_sorted_by_id(&self) -> Vec<Arc<TrackedRecord>> {
        self.inner.read().all_sorted_by_id().cloned().collect()
    }

    pub fn top_urgent(&self, k: usize) -> Vec<Arc<TrackedRecord>> {
        // The heap snapshot is taken under the read lock; popping happens after.
        let ranking = self.inner.read().top_urgent(k);
        ranking.collect()
    }

    pub fn list(&self, query: &ListingQuery) -> Listing {
        self.inner.read().list(query)
    }

    /// Allocate the next tracking id and insert `record` under it, atomically
    /// with respect to other writers.
    pub fn insert_new(&self, mut record: TrackedRecord, date: NaiveDate) -> Arc<TrackedRecord> {
        let mut index = self.inner.write();
        record.tracking_id = index.next_tracking_id(record.category, date);
        let record = Arc::new(record);
        index.upsert(Arc::clone(&record));
        record
    }

    pub fn next_tracking_id(&self, category: Category, date: NaiveDate) -> String {
        self.inner.read().next_tracking_id(category, date)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SharedRecordIndex {
    fn default() -> Self {
        Self::new()
    }
}
