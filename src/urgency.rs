//! Urgency ranking for tracked records.
//!
//! Lexicographic over:
//!
//! 1. status weight (submitted < in progress < resolved < closed < anything else)
//! 2. creation time, oldest first
//! 3. category label
//! 4. tracking id, case-insensitive
//!
//! Smaller compares as more urgent, so a min-heap pops the most urgent first.

use std::cmp::Ordering;

use crate::record::{Status, TrackedRecord};

/// Weight used for statuses outside the ranked lifecycle.
pub const UNRANKED_WEIGHT: u8 = 4;

/// Status weight; lower is more urgent.
pub fn weight(status: Status) -> u8 {
    match status {
        Status::Submitted => 0,
        Status::InProgress => 1,
        Status::Resolved => 2,
        Status::Closed => 3,
        Status::Reopened | Status::Unknown => UNRANKED_WEIGHT,
    }
}

/// Whether a record in `status` still needs work.
pub fn is_open(status: Status) -> bool {
    matches!(status, Status::Submitted | Status::InProgress)
}

/// Total urgency order. Equal only when all four keys tie.
pub fn compare(a: &TrackedRecord, b: &TrackedRecord) -> Ordering {
    weight(a.status)
        .cmp(&weight(b.status))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.category.label().cmp(b.category.label()))
        .then_with(|| cmp_ignore_case(&a.tracking_id, &b.tracking_id))
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
