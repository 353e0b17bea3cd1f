//! Per-author estimation and ranking.

use rayon::prelude::*;
use serde::Serialize;

use crate::estimate::{EstimateError, estimate_total_time};
use crate::history::{AuthorTimeline, CommitRecord, group_by_author};
use crate::session::split_sessions;

/// Configuration for time estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimateConfig {
    /// Idle gap in seconds. Commits further apart than this fall into
    /// separate sessions. Default: 7200 (2 hours).
    pub session_split_secs: u64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            session_split_secs: 7_200, // 2 hours
        }
    }
}

/// Estimation result for one author, before any filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorOutcome {
    pub author: String,
    pub commit_count: usize,
    pub session_count: usize,
    /// Earliest commit, `None` only when the author has no commits.
    pub first_commit: Option<i64>,
    /// Latest commit, `None` only when the author has no commits.
    pub last_commit: Option<i64>,
    /// Estimated active seconds, or why there is none.
    pub estimate: Result<f64, EstimateError>,
}

/// A ranked author with a usable estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorEstimate {
    pub author: String,
    pub total_seconds: f64,
    pub commit_count: usize,
    pub session_count: usize,
    pub first_commit: i64,
    pub last_commit: i64,
}

fn estimate_author(author: &str, timestamps: &[i64], session_split_secs: u64) -> AuthorOutcome {
    let sessions = split_sessions(timestamps, session_split_secs);
    let estimate = estimate_total_time(&sessions);

    tracing::trace!(
        author,
        commits = timestamps.len(),
        sessions = sessions.len(),
        ?estimate,
        "estimated author"
    );

    AuthorOutcome {
        author: author.to_string(),
        commit_count: timestamps.len(),
        session_count: sessions.len(),
        first_commit: sessions.first().map(|s| s.first()),
        last_commit: sessions.last().map(|s| s.last()),
        estimate,
    }
}

/// Split and estimate every author in the timeline.
///
/// Authors are processed in parallel. Output order follows the timeline's
/// iteration order (ascending author name).
pub fn estimate_authors(timeline: &AuthorTimeline, config: &EstimateConfig) -> Vec<AuthorOutcome> {
    let authors: Vec<(&String, &Vec<i64>)> = timeline.iter().collect();

    authors
        .par_iter()
        .map(|(author, timestamps)| {
            estimate_author(author, timestamps, config.session_split_secs)
        })
        .collect()
}

/// Whether an author belongs in ranked output.
///
/// True iff the estimate exists and is strictly positive. Authors with only
/// lone-commit sessions, or with a zero total, are seasonal contributors.
pub fn is_rankable(outcome: &AuthorOutcome) -> bool {
    matches!(outcome.estimate, Ok(total) if total > 0.0)
}

/// Drop unrankable authors and sort the rest by estimated time, descending.
///
/// The sort is stable: equal totals keep their input order.
pub fn rank_authors(outcomes: Vec<AuthorOutcome>) -> Vec<AuthorEstimate> {
    let mut ranked: Vec<AuthorEstimate> = outcomes
        .into_iter()
        .filter_map(|outcome| {
            if !is_rankable(&outcome) {
                match outcome.estimate {
                    Err(err) => tracing::debug!(author = %outcome.author, %err, "excluding author"),
                    Ok(_) => tracing::debug!(
                        author = %outcome.author,
                        "excluding author with zero estimated time"
                    ),
                }
                return None;
            }

            let (Ok(total_seconds), Some(first_commit), Some(last_commit)) =
                (outcome.estimate, outcome.first_commit, outcome.last_commit)
            else {
                return None;
            };

            Some(AuthorEstimate {
                author: outcome.author,
                total_seconds,
                commit_count: outcome.commit_count,
                session_count: outcome.session_count,
                first_commit,
                last_commit,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.total_seconds.total_cmp(&a.total_seconds));
    ranked
}

/// Estimate and rank every author in a commit history.
pub fn analyze(records: &[CommitRecord], config: &EstimateConfig) -> Vec<AuthorEstimate> {
    let timeline = group_by_author(records);
    let ranked = rank_authors(estimate_authors(&timeline, config));

    tracing::debug!(
        authors = timeline.len(),
        ranked = ranked.len(),
        session_split_secs = config.session_split_secs,
        "analyzed history"
    );
    ranked
}
