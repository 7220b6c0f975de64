//! Tracking-id generation.
//!
//! Ids look like `MC-RD-20250101-0001`: a fixed `MC` tag, the category code,
//! the filing date and a per-(category, date) sequence number.

use chrono::NaiveDate;

use crate::record::Category;

const TAG: &str = "MC";

/// Prefix shared by every id for `category` filed on `date`, e.g. `MC-RD-20250101-`.
pub fn tracking_prefix(category: Category, date: NaiveDate) -> String {
    format!("{TAG}-{}-{}-", category.code(), date.format("%Y%m%d"))
}

/// Next free id for `category` on `date`, given the ids already issued.
///
/// Existing ids match the prefix ignoring ASCII case; a trailing segment that
/// does not parse counts as `0`. The sequence number saturates at `u64::MAX`.
pub fn next_tracking_id<'a, I>(category: Category, date: NaiveDate, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = tracking_prefix(category, date);
    let max = existing
        .into_iter()
        .filter(|id| starts_with_ignore_ascii_case(id, &prefix))
        .map(|id| id.rsplit('-').next().and_then(|tail| tail.parse::<u64>().ok()).unwrap_or(0))
        .max()
        .unwrap_or(0);
    format!("{prefix}{:04}", max.saturating_add(1))
}

fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
