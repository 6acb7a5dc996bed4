//! Command-line interface for tunedeck.
//!
//! This module provides CLI commands for managing the library and
//! exercising the metadata core without a GUI shell.

mod commands;

pub use commands::{Cli, Commands, run_command};
