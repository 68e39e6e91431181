//! CLI command definitions using Clap.
//!
//! - `layout` - Blueprint inspection and scripted sessions
//! - `types` - Shared argument parsing helpers

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::{self, GridtileConfig};
use crate::error::GridtileError;
use crate::schema;

pub mod layout;
pub mod types;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gridtile CLI - grid tile layouts driven by keyboard and gamepad.
#[derive(Parser, Debug)]
#[command(name = "gridtile")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// List available blueprints.
    ///
    /// Shows the configured blueprints, or the built-in ones when the
    /// configuration defines none.
    Blueprints {
        /// Output in JSON format instead of table format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Show a blueprint's initial layout.
    ///
    /// Prints an occupancy map of the grid followed by a table of tiles.
    /// Frames are drawn as `#`, empty cells as `.`, and tiles by letter.
    #[command(after_long_help = r"Examples:
  gridtile show
  gridtile show --blueprint kanban-3x4
  gridtile show -b wide-2x4 --json")]
    Show {
        /// Blueprint ID (defaults to the first blueprint).
        #[arg(long, short)]
        blueprint: Option<String>,

        /// Output the layout snapshot as JSON.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Replay key presses through a layout session.
    ///
    /// Each key token is translated exactly as an interactive key press
    /// would be, and the resulting feedback and final layout are printed.
    ///
    /// Tokens: left, right, up, down (navigate), shift+<arrow> (resize),
    /// alt+<arrow> (move), enter (maximize), [ and ] (switch blueprint),
    /// r (reset), s (save), l (load), a (apply to window).
    #[command(after_long_help = r"Examples:
  gridtile play right down enter
  gridtile play --blueprint wide-2x4 shift+right alt+down
  gridtile play --script moves.txt --json
  gridtile play --ephemeral s r l")]
    Play {
        /// Key tokens to replay, in order.
        #[arg(value_name = "KEY")]
        keys: Vec<String>,

        /// Read additional key tokens from a file (whitespace separated,
        /// `#` starts a comment).
        #[arg(long, short, value_name = "FILE")]
        script: Option<PathBuf>,

        /// Blueprint ID to start with (defaults to the first blueprint).
        #[arg(long, short)]
        blueprint: Option<String>,

        /// Keep saved layouts in memory instead of the layouts file.
        #[arg(long, short)]
        ephemeral: bool,

        /// Output steps and the final snapshot as JSON.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Output Gridtile configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// Gridtile configuration file. Can be redirected to a file for use with
    /// editors that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(gridtile completions --shell zsh)"
    ///   gridtile completions --shell bash > ~/.local/share/bash-completion/completions/gridtile
    ///   gridtile completions --shell fish > ~/.config/fish/completions/gridtile.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), GridtileError> {
        match &self.command {
            Commands::Blueprints { json } => {
                layout::execute_blueprints(&self.load_config(), *json)?;
            }

            Commands::Show { blueprint, json } => {
                layout::execute_show(&self.load_config(), blueprint.as_deref(), *json)?;
            }

            Commands::Play { keys, script, blueprint, ephemeral, json } => {
                let mut tokens = keys.clone();
                if let Some(path) = script {
                    tokens.extend(types::read_script(path)?);
                }
                let options = layout::PlayOptions {
                    blueprint: blueprint.as_deref(),
                    ephemeral: *ephemeral,
                    json: *json,
                };
                layout::execute_play(&self.load_config(), &tokens, &options)?;
            }

            Commands::Schema => {
                let schema_output = schema::print_schema();
                println!("{schema_output}");
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
            }
        }

        Ok(())
    }

    fn load_config(&self) -> GridtileConfig { config::load_or_default(self.config.as_deref()).0 }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "gridtile", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() { Cli::command().debug_assert(); }

    #[test]
    fn test_parse_play_with_keys() {
        let cli = Cli::try_parse_from(["gridtile", "play", "right", "shift+down", "-b", "wide-2x4"])
            .unwrap();
        match cli.command {
            Commands::Play { keys, blueprint, ephemeral, .. } => {
                assert_eq!(keys, vec!["right", "shift+down"]);
                assert_eq!(blueprint.as_deref(), Some("wide-2x4"));
                assert!(!ephemeral);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["gridtile", "blueprints", "--config", "/tmp/g.jsonc"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/g.jsonc")));
    }

    #[test]
    fn test_completions_requires_shell() {
        assert!(Cli::try_parse_from(["gridtile", "completions"]).is_err());
        assert!(Cli::try_parse_from(["gridtile", "completions", "--shell", "zsh"]).is_ok());
    }
}
