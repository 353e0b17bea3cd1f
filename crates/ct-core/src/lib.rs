//! Core domain logic for the commit time estimator.
//!
//! This crate contains the fundamental types and logic for:
//! - History grouping: collecting commit timestamps per author
//! - Session partitioning: splitting timestamps at idle gaps
//! - Estimation: turning sessions into an active-time total
//! - Ranking: filtering out authors without enough signal and sorting the rest

mod estimate;
pub mod history;
mod ranking;
pub mod session;

pub use estimate::{EstimateError, average_commit_interval, estimate_total_time};
pub use history::{AuthorTimeline, CommitRecord, group_by_author};
pub use ranking::{
    AuthorEstimate, AuthorOutcome, EstimateConfig, analyze, estimate_authors, is_rankable,
    rank_authors,
};
pub use session::{Session, split_sessions};
