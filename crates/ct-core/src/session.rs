//! Session partitioning.
//!
//! Splits one author's commit timestamps into sessions: maximal runs of
//! commits where no two neighbours are more than `session_split` seconds apart.

use serde::Serialize;

/// A burst of commits by one author.
///
/// Always non-empty and sorted ascending. Only [`split_sessions`] builds
/// sessions, which keeps both properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Session {
    timestamps: Vec<i64>,
}

impl Session {
    /// Commit timestamps in ascending order.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Timestamp of the first commit.
    pub fn first(&self) -> i64 {
        self.timestamps[0]
    }

    /// Timestamp of the last commit.
    pub fn last(&self) -> i64 {
        self.timestamps[self.timestamps.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always false for sessions built by [`split_sessions`].
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Whether this session holds a single commit.
    pub fn is_lone_commit(&self) -> bool {
        self.timestamps.len() == 1
    }

    /// Observed span in seconds. Zero for a lone-commit session.
    pub fn duration(&self) -> u64 {
        self.last().abs_diff(self.first())
    }

    /// Gaps between consecutive commits, in seconds.
    pub fn gaps(&self) -> impl Iterator<Item = u64> + '_ {
        self.timestamps.windows(2).map(|w| w[1].abs_diff(w[0]))
    }

    /// Consumes the session, returning its timestamps.
    pub fn into_timestamps(self) -> Vec<i64> {
        self.timestamps
    }
}

/// Split timestamps into sessions.
///
/// # Algorithm
///
/// 1. Sort timestamps ascending
/// 2. Walk them in order, closing the current session whenever the gap to its
///    most recent member exceeds `session_split`
/// 3. Close the trailing session
///
/// Empty input yields no sessions. Sessions come back in chronological order
/// and together contain every input timestamp exactly once.
pub fn split_sessions(timestamps: &[i64], session_split: u64) -> Vec<Session> {
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let mut sessions = Vec::new();
    let mut current: Vec<i64> = Vec::new();

    for ts in sorted {
        let should_start_new_session = current
            .last()
            .is_some_and(|&last| ts.abs_diff(last) > session_split);

        if should_start_new_session {
            sessions.push(Session {
                timestamps: std::mem::take(&mut current),
            });
        }

        current.push(ts);
    }

    if !current.is_empty() {
        sessions.push(Session {
            timestamps: current,
        });
    }

    sessions
}
