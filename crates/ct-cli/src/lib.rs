//! Commit time estimator CLI library.
//!
//! This crate provides the CLI interface for the commit time estimator.

mod cli;
pub mod commands;
mod config;

pub use cli::Cli;
pub use config::{Config, ConfigOverrides};
