use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ct_cli::commands::report;
use ct_cli::{Cli, Config};

/// Load config from files and environment, then apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(&cli.overrides);
    config.validate().context("invalid configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // stdout carries the report; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = load_config(&cli)?;

    let stdout = std::io::stdout();
    report::run(&mut stdout.lock(), &cli.report, &config)?;

    Ok(())
}
