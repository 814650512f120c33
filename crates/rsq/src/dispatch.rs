//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::compose::ComposeOptions;
use crate::commands::config::Config;
use crate::commands::operators::OperatorsTarget;
use crate::commands::terms::TermsOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that only need the command context.
pub trait ContextCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that read field metadata from the config file.
pub trait ConfigCommand {
    /// Execute the command with the loaded configuration.
    fn execute(&self, ctx: &CommandContext, config: &Config) -> Result<()>;
}

/// Commands that work on their arguments alone.
pub enum ContextDispatch<'a> {
    Parse(&'a str),
    Check(&'a str),
    Terms(TermsOptions),
    Plaintext(&'a str),
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> ContextDispatch<'a> {
    /// Try to create a context-only dispatch from the CLI command.
    /// Returns None if the command needs field metadata.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Parse { query }) => Some(Self::Parse(query)),
            Some(Commands::Check { query }) => Some(Self::Check(query)),
            Some(Commands::Terms { text, filter }) => Some(Self::Terms(TermsOptions {
                text: text.clone(),
                as_filter: *filter,
            })),
            Some(Commands::Plaintext { query }) => Some(Self::Plaintext(query)),
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl ContextCommand for ContextDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Parse(query) => commands::parse::execute(ctx, query),
            Self::Check(query) => commands::check::execute(ctx, query),
            Self::Terms(opts) => commands::terms::execute(ctx, opts),
            Self::Plaintext(query) => commands::plaintext::execute(ctx, query),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("rsq - rsk search query tool");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that need the configured field metadata.
pub enum ConfigDispatch<'a> {
    Compose(ComposeOptions),
    Operators(OperatorsTarget<'a>),
}

impl<'a> ConfigDispatch<'a> {
    /// Create a dispatch from the CLI command.
    /// Returns None if the command does not need field metadata.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Compose { field, op, value }) => Some(Self::Compose(ComposeOptions {
                field: field.clone(),
                op: *op,
                value: value.clone(),
            })),
            Some(Commands::Operators { kind, field }) => {
                let target = match (kind, field) {
                    (_, Some(name)) => OperatorsTarget::Field(name),
                    (Some(kind), None) => OperatorsTarget::Kind(*kind),
                    // clap requires one of the two
                    (None, None) => return None,
                };
                Some(Self::Operators(target))
            }
            _ => None,
        }
    }
}

impl ConfigCommand for ConfigDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, config: &Config) -> Result<()> {
        match self {
            Self::Compose(opts) => commands::compose::execute(ctx, config, opts),
            Self::Operators(target) => commands::operators::execute(ctx, config, target),
        }
    }
}
