//! Command implementations for the rsq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod compose;
pub mod config;
pub mod operators;
pub mod parse;
pub mod plaintext;
pub mod terms;

use std::env;

use rsk_query_rs::filter::{FilterError, ParseError};
use rsk_query_rs::terms::TermError;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter query rejected by the parser or by field metadata.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Syntax error found while checking a query.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// Search text that does not split into terms.
    #[error("search text error: {0}")]
    Terms(#[from] TermError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are off when `--no-color` is given or `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }

    /// Applies the `[output]` settings from the config file.
    ///
    /// Command-line flags win: a config file can turn colors off but never
    /// back on after `--no-color`.
    pub fn with_config(mut self, config: &config::Config) -> Self {
        if config.output.color == Some(false) {
            self.use_colors = false;
        }
        self
    }
}
