//! CLI subcommand definitions

use clap::Subcommand;

use crate::core::Origin;

/// Main CLI commands
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Acquire the pricing catalog and report where it came from
    Pricing,
    /// Show which catalog entry a model name resolves to
    Lookup {
        /// Model name as it appears in usage logs
        model: String,
        /// Tool the model name came from
        #[arg(long, value_enum, default_value = "claude")]
        origin: Origin,
        /// Provider the request was routed through (e.g. "openrouter")
        #[arg(long)]
        provider: Option<String>,
    },
    /// Claude Code usage costs (default)
    Claude,
    /// OpenAI Codex CLI usage costs
    Codex,
}

impl Commands {
    /// Name of the log source a report command reads
    pub(crate) fn source_name(&self) -> Option<&'static str> {
        match self {
            Commands::Claude => Some("claude"),
            Commands::Codex => Some("codex"),
            Commands::Pricing | Commands::Lookup { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_commands_name_their_source() {
        assert_eq!(Commands::Claude.source_name(), Some("claude"));
        assert_eq!(Commands::Codex.source_name(), Some("codex"));
        assert_eq!(Commands::Pricing.source_name(), None);
    }
}
