//! Tunedeck - a desktop music player's metadata core.
//!
//! Keeps a file-backed track library, enriches selected tracks with
//! metadata from a remote music catalog, and caches results locally so
//! they can be reapplied without repeating network calls. The GUI shell
//! consumes the [`session::PlayerSession`] facade; the CLI here drives
//! the same surface for scripting and debugging.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover;
pub mod editor;
pub mod error;
pub mod library;
pub mod model;
pub mod resolver;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod test_utils;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("tunedeck=info".parse().unwrap()))
        .init();

    // Try to run a CLI command
    if cli::run_command(&args)? {
        return Ok(());
    }

    // No command specified - the GUI shell is a separate concern, so
    // just show what the core can do
    cli::Cli::command().print_help()?;
    Ok(())
}
