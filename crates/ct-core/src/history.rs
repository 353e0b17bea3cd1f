//! Commit history records and per-author grouping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single commit as read from version-control history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Author identifier, compared by exact string equality.
    pub author: String,
}

impl CommitRecord {
    pub fn new(timestamp: i64, author: impl Into<String>) -> Self {
        Self {
            timestamp,
            author: author.into(),
        }
    }
}

/// Commit timestamps keyed by author.
///
/// Timestamps keep the order they were encountered in; session splitting sorts
/// them. Authors iterate in lexicographic order.
pub type AuthorTimeline = BTreeMap<String, Vec<i64>>;

/// Group a flat commit history by author.
///
/// No filtering or deduplication happens here: two commits by the same author
/// in the same second stay two entries.
pub fn group_by_author(records: &[CommitRecord]) -> AuthorTimeline {
    let mut timeline = AuthorTimeline::new();

    for record in records {
        timeline
            .entry(record.author.clone())
            .or_default()
            .push(record.timestamp);
    }

    tracing::debug!(
        records = records.len(),
        authors = timeline.len(),
        "grouped history by author"
    );
    timeline
}
