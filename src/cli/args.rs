//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;

use clap::Parser;

use crate::config::Config;

use super::commands::Commands;

#[derive(Debug, Parser)]
#[command(name = "tokcost")]
#[command(about = "Estimate the cost of AI coding assistant token usage", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Use cached pricing only (skip fetching from LiteLLM)
    #[arg(short = 'O', long, global = true)]
    pub(crate) offline: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Suppress pricing status lines
    #[arg(short, long, global = true)]
    pub(crate) quiet: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        self.offline |= config.offline;
        self.no_color |= config.no_color;
        self.debug |= config.debug;
        self
    }

    /// Subcommand to run; Claude reports when none is given.
    pub(crate) fn take_command(&mut self) -> Commands {
        self.command.take().unwrap_or(Commands::Claude)
    }

    pub(crate) fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    /// Status lines would corrupt piped JSON; quiet mode drops them too.
    pub(crate) fn show_status(&self) -> bool {
        !self.quiet && !self.json
    }
}
