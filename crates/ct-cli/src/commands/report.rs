//! Report command: rank authors by estimated active time.
//!
//! Reads the repository history, runs the estimator, and renders the ranked
//! authors either as aligned text rows or as JSON.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use ct_core::AuthorEstimate;
use serde::Serialize;

use crate::Config;
use crate::commands::util::parse_datetime;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Path to the git repository.
    #[arg(default_value = ".")]
    pub repo: PathBuf,

    /// Ignore commits before this time (ISO 8601, YYYY-MM-DD, @unix, or "N days ago").
    #[arg(long)]
    pub since: Option<String>,

    /// Ignore commits after this time (same formats as --since).
    #[arg(long)]
    pub until: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One ranked author, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub rank: usize,
    pub author: String,
    pub total_seconds: f64,
    /// `total_seconds` rendered by [`format_duration`].
    pub time: String,
    pub commits: usize,
    pub sessions: usize,
    pub first_commit: Option<DateTime<Utc>>,
    pub last_commit: Option<DateTime<Utc>>,
}

/// Shown instead of rows when no author could be ranked.
const EMPTY_REPORT: &str = "No authors with enough activity to estimate.";

/// Width of the author column; longer names are cut.
const AUTHOR_WIDTH: usize = 20;

// ========== Duration Formatting ==========

/// Units used for duration display, largest first.
const UNITS: [(&str, u64); 5] = [
    ("w", 604_800), // 60 * 60 * 24 * 7
    ("d", 86_400),  // 60 * 60 * 24
    ("h", 3_600),   // 60 * 60
    ("m", 60),
    ("s", 1),
];

/// Formats seconds as a compact duration such as "2w3d" or "8m20s".
///
/// Keeps the `granularity` largest non-zero units, each floored. Values under
/// one second (or negative) render as "0s".
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn format_duration(seconds: f64, granularity: usize) -> String {
    let mut remaining = seconds.max(0.0);
    let mut parts = Vec::new();

    for (name, unit) in UNITS {
        let unit = unit as f64;
        let value = (remaining / unit).floor();
        if value >= 1.0 {
            remaining -= value * unit;
            parts.push(format!("{}{name}", value as u64));
        }
    }

    if parts.is_empty() {
        return "0s".to_string();
    }

    parts.truncate(granularity.max(1));
    parts.concat()
}

// ========== Report Generation ==========

/// Builds display rows from ranked estimates, keeping at most `top_k`.
pub fn build_rows(
    estimates: &[AuthorEstimate],
    granularity: usize,
    top_k: Option<usize>,
) -> Vec<ReportRow> {
    estimates
        .iter()
        .take(top_k.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(idx, estimate)| ReportRow {
            rank: idx + 1,
            author: estimate.author.clone(),
            total_seconds: estimate.total_seconds,
            time: format_duration(estimate.total_seconds, granularity),
            commits: estimate.commit_count,
            sessions: estimate.session_count,
            first_commit: DateTime::from_timestamp(estimate.first_commit, 0),
            last_commit: DateTime::from_timestamp(estimate.last_commit, 0),
        })
        .collect()
}

/// Formats rows as aligned text, one author per line.
pub fn format_report(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_REPORT}\n");
    }

    let mut output = String::new();
    for row in rows {
        let author: String = row.author.chars().take(AUTHOR_WIDTH).collect();
        writeln!(
            output,
            "#{:>3}. {author:<AUTHOR_WIDTH$} {:>15} ({:>4} commits)",
            row.rank, row.time, row.commits
        )
        .unwrap();
    }
    output
}

/// Formats rows as a pretty-printed JSON array.
pub fn format_json(rows: &[ReportRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("failed to serialize report")
}

fn parse_bound(value: Option<&str>, flag: &str) -> Result<Option<i64>> {
    value
        .map(|s| {
            parse_datetime(s)
                .map(|dt| dt.timestamp())
                .with_context(|| format!("invalid {flag} value"))
        })
        .transpose()
}

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let since = parse_bound(args.since.as_deref(), "--since")?;
    let until = parse_bound(args.until.as_deref(), "--until")?;

    let options = config.log_options(since, until);
    let records = ct_git::read_history(&args.repo, &options)
        .with_context(|| format!("failed to read history of {}", args.repo.display()))?;

    let estimates = ct_core::analyze(&records, &config.estimate_config());
    let rows = build_rows(&estimates, usize::from(config.granularity), config.top_k);
    tracing::debug!(rows = rows.len(), "built report");

    if args.json {
        writeln!(writer, "{}", format_json(&rows)?)?;
    } else {
        write!(writer, "{}", format_report(&rows))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn estimate(author: &str, total_seconds: f64, commit_count: usize) -> AuthorEstimate {
        AuthorEstimate {
            author: author.to_string(),
            total_seconds,
            commit_count,
            session_count: 2,
            first_commit: 1_700_000_000,
            last_commit: 1_700_010_100,
        }
    }

    // ========== Duration Formatting Tests ==========

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(500.0, 2), "8m20s");
        assert_eq!(format_duration(100.0, 2), "1m40s");
    }

    #[test]
    fn test_format_duration_granularity() {
        // 1 day, 1 hour, 1 minute, 1 second
        assert_eq!(format_duration(90_061.0, 1), "1d");
        assert_eq!(format_duration(90_061.0, 2), "1d1h");
        assert_eq!(format_duration(90_061.0, 5), "1d1h1m1s");
    }

    #[test]
    fn test_format_duration_skips_zero_units() {
        // 2 weeks and 1 hour; days and minutes are zero
        assert_eq!(format_duration(1_213_200.0, 2), "2w1h");
    }

    #[test]
    fn test_format_duration_floors_fractions() {
        assert_eq!(format_duration(59.9, 2), "59s");
        assert_eq!(format_duration(3_659.5, 5), "1h59s");
    }

    #[test]
    fn test_format_duration_under_one_second() {
        assert_eq!(format_duration(0.0, 2), "0s");
        assert_eq!(format_duration(0.5, 2), "0s");
        assert_eq!(format_duration(-10.0, 2), "0s");
    }

    // ========== Report Tests ==========

    #[test]
    fn test_build_rows_ranks_and_truncates() {
        let estimates = vec![
            estimate("Alice", 500.0, 5),
            estimate("Bob", 100.0, 2),
            estimate("Carol", 50.0, 3),
        ];

        let rows = build_rows(&estimates, 2, Some(2));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].time, "8m20s");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].author, "Bob");
        assert_eq!(
            rows[0].first_commit.unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn test_build_rows_without_limit() {
        let estimates = vec![estimate("Alice", 500.0, 5), estimate("Bob", 100.0, 2)];

        assert_eq!(build_rows(&estimates, 2, None).len(), 2);
    }

    #[test]
    fn test_format_report_text() {
        let estimates = vec![
            estimate("Alice", 500.0, 5),
            estimate("Bob", 100.0, 2),
            estimate("Maximilian Featherstonehaugh", 777_600.0, 1234),
        ];
        let rows = build_rows(&estimates, 2, None);

        assert_snapshot!(format_report(&rows).trim_end(), @r"
        #  1. Alice                          8m20s (   5 commits)
        #  2. Bob                            1m40s (   2 commits)
        #  3. Maximilian Featherst            1w2d (1234 commits)
        ");
    }

    #[test]
    fn test_format_report_empty() {
        assert_eq!(
            format_report(&[]),
            "No authors with enough activity to estimate.\n"
        );
    }

    #[test]
    fn test_format_json() {
        let rows = build_rows(&[estimate("Alice", 500.0, 5)], 2, None);

        let json = format_json(&rows).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["rank"], 1);
        assert_eq!(value[0]["author"], "Alice");
        assert_eq!(value[0]["total_seconds"], 500.0);
        assert_eq!(value[0]["time"], "8m20s");
        assert_eq!(value[0]["commits"], 5);
        assert_eq!(value[0]["sessions"], 2);
        assert_eq!(value[0]["first_commit"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_format_json_empty() {
        assert_eq!(format_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_run_rejects_bad_since() {
        let args = ReportArgs {
            repo: PathBuf::from("."),
            since: Some("someday".to_string()),
            until: None,
            json: false,
        };
        let mut output = Vec::new();

        let err = run(&mut output, &args, &Config::default()).unwrap_err();

        assert!(err.to_string().contains("--since"));
        assert!(output.is_empty());
    }
}
