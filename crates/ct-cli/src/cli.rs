//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::report::ReportArgs;
use crate::config::ConfigOverrides;

/// Estimate how much active time each author put into a git repository.
///
/// Commits are grouped per author and split into sessions at idle gaps.
/// Session spans are summed and padded by the author's typical time between
/// commits.
#[derive(Debug, Parser)]
#[command(name = "ct", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(flatten)]
    pub report: ReportArgs,
}
