//! CLI module for Gridtile.
//!
//! Inspects blueprints and drives a layout session from scripted key presses.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::GridtileError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), GridtileError> {
    let cli = Cli::parse();
    cli.execute()
}
