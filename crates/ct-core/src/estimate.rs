//! Active-time estimation from sessions.
//!
//! A session's observed span misses the work done before its first commit and
//! after its last one. Each session is therefore padded by the author's
//! average gap between commits while active.

use thiserror::Error;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// Every session is a lone commit, so there is no commit cadence to
    /// derive compensation from.
    #[error("insufficient signal: no session contains more than one commit")]
    InsufficientSignal,
}

/// Mean gap between consecutive commits inside multi-commit sessions.
///
/// Returns `None` when no session has at least two commits. Zero gaps from
/// same-second commits are counted.
#[allow(clippy::cast_precision_loss)]
pub fn average_commit_interval(sessions: &[Session]) -> Option<f64> {
    let (total, count) = sessions
        .iter()
        .flat_map(Session::gaps)
        .fold((0u128, 0u64), |(total, count), gap| {
            (total + u128::from(gap), count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}

/// Estimate total active seconds for one author's sessions.
///
/// Total = sum of session spans + `sessions.len()` × average commit interval.
/// No rounding is applied.
#[allow(clippy::cast_precision_loss)]
pub fn estimate_total_time(sessions: &[Session]) -> Result<f64, EstimateError> {
    let avg_interval =
        average_commit_interval(sessions).ok_or(EstimateError::InsufficientSignal)?;

    let observed = sessions
        .iter()
        .map(|s| u128::from(s.duration()))
        .sum::<u128>() as f64;
    let compensation = avg_interval * sessions.len() as f64;

    tracing::trace!(
        sessions = sessions.len(),
        observed_secs = observed,
        avg_interval,
        "estimated session time"
    );

    Ok(observed + compensation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::split_sessions;
    use proptest::prelude::*;

    #[test]
    fn test_two_sessions_with_compensation() {
        let sessions = split_sessions(&[0, 100, 200, 10_000, 10_100], 500);

        assert_eq!(average_commit_interval(&sessions), Some(100.0));
        // durations 200 + 100, plus 2 sessions × 100
        assert_eq!(estimate_total_time(&sessions), Ok(500.0));
    }

    #[test]
    fn test_lone_commits_get_compensation() {
        // [0, 60] and [5000]: avg interval 60, two sessions
        let sessions = split_sessions(&[0, 60, 5_000], 1_000);

        assert_eq!(estimate_total_time(&sessions), Ok(180.0));
    }

    #[test]
    fn test_only_lone_commits_is_insufficient_signal() {
        let sessions = split_sessions(&[0, 50], 10);

        assert_eq!(average_commit_interval(&sessions), None);
        assert_eq!(
            estimate_total_time(&sessions),
            Err(EstimateError::InsufficientSignal)
        );
    }

    #[test]
    fn test_no_sessions_is_insufficient_signal() {
        assert_eq!(
            estimate_total_time(&[]),
            Err(EstimateError::InsufficientSignal)
        );
    }

    #[test]
    fn test_average_is_fractional() {
        // gaps 10 and 15
        let sessions = split_sessions(&[0, 10, 25], 100);

        assert_eq!(average_commit_interval(&sessions), Some(12.5));
        assert_eq!(estimate_total_time(&sessions), Ok(37.5));
    }

    #[test]
    fn test_same_second_commits_pull_average_down() {
        // gaps 0 and 100
        let sessions = split_sessions(&[0, 0, 100], 500);

        assert_eq!(average_commit_interval(&sessions), Some(50.0));
        assert_eq!(estimate_total_time(&sessions), Ok(150.0));
    }

    #[test]
    fn test_same_second_only_commits_estimate_zero() {
        let sessions = split_sessions(&[100, 100], 500);

        assert_eq!(estimate_total_time(&sessions), Ok(0.0));
    }

    fn timestamps() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(0i64..100_000, 0..48)
    }

    proptest! {
        #[test]
        fn prop_estimate_is_non_negative(ts in timestamps(), split in 0u64..5_000) {
            let sessions = split_sessions(&ts, split);

            if let Ok(total) = estimate_total_time(&sessions) {
                prop_assert!(total >= 0.0);
                prop_assert!(total.is_finite());
            }
        }

        #[test]
        fn prop_isolated_commits_have_no_estimate(
            starts in prop::collection::btree_set(0i64..1_000, 1..20),
        ) {
            // Spread distinct values 1000s apart so every gap exceeds the split.
            let ts: Vec<i64> = starts.into_iter().map(|v| v * 1_000).collect();
            let sessions = split_sessions(&ts, 999);

            prop_assert_eq!(
                estimate_total_time(&sessions),
                Err(EstimateError::InsufficientSignal)
            );
        }

        #[test]
        fn prop_larger_split_never_lowers_estimate(
            ts in timestamps(),
            split in 0u64..5_000,
            extra in 0u64..5_000,
        ) {
            let narrow = estimate_total_time(&split_sessions(&ts, split));
            let wide = estimate_total_time(&split_sessions(&ts, split + extra));

            if let (Ok(narrow), Ok(wide)) = (narrow, wide) {
                prop_assert!(wide + 1e-6 * narrow.max(1.0) >= narrow);
            }
        }
    }
}
