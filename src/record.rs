//! Tracked records: the values a [`RecordIndex`](crate::RecordIndex) stores.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a tracked record.
///
/// Statuses the model does not know deserialize to [`Status::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Reported, nobody working on it yet.
    Submitted,
    InProgress,
    Resolved,
    Closed,
    Reopened,
    #[serde(other)]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Submitted,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
        Status::Reopened,
        Status::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Submitted => "submitted",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
            Status::Reopened => "reopened",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service category a record was filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Roads,
    Water,
    Electricity,
    Sanitation,
    Waste,
    Parks,
    PublicSafety,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Roads,
        Category::Water,
        Category::Electricity,
        Category::Sanitation,
        Category::Waste,
        Category::Parks,
        Category::PublicSafety,
        Category::Other,
    ];

    /// Label used for display and for urgency tie-breaking.
    pub fn label(self) -> &'static str {
        match self {
            Category::Roads => "Roads",
            Category::Water => "Water",
            Category::Electricity => "Electricity",
            Category::Sanitation => "Sanitation",
            Category::Waste => "Waste",
            Category::Parks => "Parks",
            Category::PublicSafety => "PublicSafety",
            Category::Other => "Other",
        }
    }

    /// Two-letter code embedded in tracking ids.
    pub fn code(self) -> &'static str {
        match self {
            Category::Roads => "RD",
            Category::Water => "WT",
            Category::Electricity => "EL",
            Category::Sanitation => "SN",
            Category::Waste => "WS",
            Category::Parks => "PK",
            Category::PublicSafety => "PS",
            Category::Other => "OT",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reported issue as seen by the index.
///
/// `tracking_id` is the ordering key and never changes once assigned. A record
/// with a blank tracking id is valid data but cannot be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRecord {
    pub tracking_id: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub category: Category,

    // ── Free text, not used for ordering ──
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_paths: Vec<String>,
}

impl TrackedRecord {
    pub fn new(
        tracking_id: impl Into<String>,
        status: Status,
        created_at: DateTime<Utc>,
        category: Category,
    ) -> Self {
        Self {
            tracking_id: tracking_id.into(),
            status,
            created_at,
            category,
            location: String::new(),
            description: String::new(),
            attachment_paths: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this record can be addressed by tracking id.
    pub fn is_addressable(&self) -> bool {
        !self.tracking_id.trim().is_empty()
    }
}
