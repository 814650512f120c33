//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the rsq CLI.

use clap::{Parser, Subcommand, ValueEnum};
use rsk_query_rs::filter::CompOp;
use rsk_query_rs::meta::FieldMetaKind;

/// rsq - Parse, check and translate rsk search queries
#[derive(Parser, Debug)]
#[command(name = "rsq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a filter query and print its canonical form
    #[command(alias = "p")]
    Parse {
        /// Filter query (e.g., 'actor = "karl" and episode > 3')
        query: String,
    },

    /// Check a filter query as it is typed, highlighting each part
    #[command(alias = "c")]
    Check {
        /// Filter query, complete or partial
        query: String,
    },

    /// Split human search text into terms
    #[command(alias = "t")]
    Terms {
        /// Search text (e.g., 'monkey news @karl ~xfm')
        text: String,

        /// Print the equivalent filter query instead of the terms
        #[arg(short, long)]
        filter: bool,
    },

    /// Turn a filter query back into human search text
    Plaintext {
        /// Filter query
        query: String,
    },

    /// Build a single comparison from a field, an operator and a raw value
    Compose {
        /// Field name
        #[arg(short, long)]
        field: String,

        /// Comparison operator (=, !=, ~=, ~, <, <=, >, >=)
        #[arg(short, long, value_parser = parse_comp_op, allow_hyphen_values = true)]
        op: CompOp,

        /// Raw value, typed according to the field
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// List the operators supported by a field kind
    Operators {
        /// Field kind (e.g., INT, KEYWORD, TEXT)
        #[arg(required_unless_present = "field", conflicts_with = "field")]
        kind: Option<FieldMetaKind>,

        /// Look up the kind of a configured field instead
        #[arg(short, long)]
        field: Option<String>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,
}

fn parse_comp_op(s: &str) -> Result<CompOp, String> {
    CompOp::from_symbol(s.trim()).ok_or_else(|| {
        let valid: Vec<_> = CompOp::ALL.iter().map(CompOp::as_str).collect();
        format!("unknown operator '{s}' (expected one of {})", valid.join(" "))
    })
}
