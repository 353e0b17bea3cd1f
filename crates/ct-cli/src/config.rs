//! Configuration loading and management.

use std::path::{Path, PathBuf};

use clap::Args;
use ct_core::EstimateConfig;
use ct_git::{Identity, LogOptions};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Idle gap in seconds that splits commit sessions.
    pub session_split: u64,

    /// Number of largest time units shown per duration (1-5).
    pub granularity: u8,

    /// Show only the top k authors.
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Author identity field (`name` or `email`).
    pub identity: Identity,

    /// Read commits from all refs rather than only HEAD.
    pub all_refs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_split: EstimateConfig::default().session_split_secs,
            granularity: 2,
            top_k: None,
            identity: Identity::Name,
            all_refs: true,
        }
    }
}

/// Command-line flags that take precedence over file and environment config.
#[derive(Debug, Default, Args)]
pub struct ConfigOverrides {
    /// Time between commits that splits sessions, in seconds.
    #[arg(short = 't', long)]
    pub session_split: Option<u64>,

    /// Number of time units to display per author (1-5).
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub granularity: Option<u8>,

    /// Display the top k authors by total time.
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Identify authors by name or email.
    #[arg(long)]
    pub identity: Option<Identity>,

    /// Only read commits reachable from HEAD.
    #[arg(long)]
    pub head_only: bool,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CT_*)
        figment = figment.merge(Env::prefixed("CT_"));

        figment.extract()
    }

    /// Applies command-line overrides on top of loaded configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(session_split) = overrides.session_split {
            self.session_split = session_split;
        }
        if let Some(granularity) = overrides.granularity {
            self.granularity = granularity;
        }
        if overrides.top_k.is_some() {
            self.top_k = overrides.top_k;
        }
        if let Some(identity) = overrides.identity {
            self.identity = identity;
        }
        if overrides.head_only {
            self.all_refs = false;
        }
        self
    }

    /// Rejects values the estimator or report cannot use.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.session_split > 0,
            "session_split must be a positive number of seconds"
        );
        anyhow::ensure!(
            (1..=5).contains(&self.granularity),
            "granularity must be between 1 and 5, got {}",
            self.granularity
        );
        anyhow::ensure!(self.top_k != Some(0), "top_k must be at least 1");
        Ok(())
    }

    pub const fn estimate_config(&self) -> EstimateConfig {
        EstimateConfig {
            session_split_secs: self.session_split,
        }
    }

    /// History reader options for an optional `[since, until]` window.
    pub const fn log_options(&self, since: Option<i64>, until: Option<i64>) -> LogOptions {
        LogOptions {
            identity: self.identity,
            all_refs: self.all_refs,
            since,
            until,
        }
    }
}

/// Returns the platform-specific config directory for ct.
///
/// On Linux: `~/.config/ct`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ct"))
}
