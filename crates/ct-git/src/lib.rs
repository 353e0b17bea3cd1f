//! Git history reader.
//!
//! Runs `git log` and turns its `timestamp|author` lines into
//! [`CommitRecord`]s for the estimator.

use std::path::Path;
use std::process::{Command, ExitStatus};

use ct_core::CommitRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which commit field identifies an author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// Author name (`%an`).
    #[default]
    Name,
    /// Author email (`%ae`).
    Email,
}

impl Identity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
        }
    }

    /// The `git log` pretty-format placeholder for this field.
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Name => "%an",
            Self::Email => "%ae",
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Identity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            _ => Err(format!("invalid identity: {s} (expected name or email)")),
        }
    }
}

#[derive(Debug, Error)]
pub enum GitError {
    #[error("repository not found: {0}")]
    RepoNotFound(String),
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("git log exited with {status}: {stderr}")]
    CommandFailed { status: ExitStatus, stderr: String },
    #[error("malformed history line {line_number}: {line:?}")]
    MalformedRecord { line_number: usize, line: String },
}

/// Options controlling which commits are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Author identity field.
    pub identity: Identity,
    /// Include commits reachable from any ref (`--all`), not only HEAD.
    pub all_refs: bool,
    /// Drop commits before this unix timestamp (inclusive bound).
    pub since: Option<i64>,
    /// Drop commits after this unix timestamp (inclusive bound).
    pub until: Option<i64>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            identity: Identity::Name,
            all_refs: true,
            since: None,
            until: None,
        }
    }
}

/// Arguments passed to `git` to list commit timestamps and authors.
pub fn log_args(options: &LogOptions) -> Vec<String> {
    let mut args = vec!["log".to_string()];
    if options.all_refs {
        args.push("--all".to_string());
    }
    args.push(format!("--format=format:%at|{}", options.identity.placeholder()));
    args
}

/// Parse a single `timestamp|author` line.
///
/// Splits on the first `|` only, so authors may contain the separator.
fn parse_log_line(line: &str, line_number: usize) -> Result<CommitRecord, GitError> {
    let malformed = || GitError::MalformedRecord {
        line_number,
        line: line.to_string(),
    };

    let (timestamp, author) = line.split_once('|').ok_or_else(malformed)?;
    let timestamp = timestamp.trim().parse::<i64>().map_err(|_| malformed())?;

    Ok(CommitRecord::new(timestamp, author))
}

/// Parse `git log` output into commit records.
///
/// Blank lines are skipped; line numbers in errors are 1-based.
pub fn parse_history(output: &str) -> Result<Vec<CommitRecord>, GitError> {
    output
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_log_line(line, idx + 1))
        .collect()
}

/// Keep records whose timestamp lies within `[since, until]`.
pub fn filter_window(
    records: Vec<CommitRecord>,
    since: Option<i64>,
    until: Option<i64>,
) -> Vec<CommitRecord> {
    records
        .into_iter()
        .filter(|r| since.is_none_or(|s| r.timestamp >= s))
        .filter(|r| until.is_none_or(|u| r.timestamp <= u))
        .collect()
}

/// Read commit history from the repository at `repo`.
pub fn read_history(repo: &Path, options: &LogOptions) -> Result<Vec<CommitRecord>, GitError> {
    if !repo.exists() {
        return Err(GitError::RepoNotFound(repo.display().to_string()));
    }

    let args = log_args(options);
    tracing::debug!(repo = %repo.display(), ?args, "running git log");

    let output = Command::new("git").args(&args).current_dir(repo).output()?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let records = parse_history(&stdout)?;
    let total = records.len();
    let records = filter_window(records, options.since, options.until);

    tracing::debug!(read = total, kept = records.len(), "read git history");
    Ok(records)
}
