//! Core data types shared across all data sources
//!
//! Every loader converts its native log format into [`UsageEntry`].

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tool that produced a usage entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Origin {
    /// Claude Code
    Claude,
    /// OpenAI Codex CLI
    Codex,
    /// Gemini CLI
    Gemini,
}

impl Origin {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Origin::Claude => "claude",
            Origin::Codex => "codex",
            Origin::Gemini => "gemini",
        }
    }

    /// Catalog providers tried for entries of this origin, after the entry's own provider.
    pub(crate) fn implicit_providers(self) -> &'static [&'static str] {
        match self {
            Origin::Claude => &["anthropic", "vertex_ai"],
            Origin::Codex => &["openai", "azure", "openrouter/openai"],
            Origin::Gemini => &["gemini", "vertex_ai"],
        }
    }

    /// Cache reads are a subset of the reported input tokens.
    pub(crate) fn cache_read_included_in_input(self) -> bool {
        matches!(self, Origin::Codex)
    }

    /// Reasoning tokens are reported apart from output and billed at the output rate.
    pub(crate) fn reasoning_billed_as_output(self) -> bool {
        matches!(self, Origin::Gemini)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed unit of model usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct UsageEntry {
    pub(crate) origin: Origin,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) model: String,
    /// Provider reported by the tool itself, if any
    pub(crate) provider: Option<String>,
    pub(crate) input_tokens: u64,
    pub(crate) output_tokens: u64,
    pub(crate) cache_read_tokens: u64,
    pub(crate) cache_write_tokens: u64,
    pub(crate) reasoning_tokens: u64,
    /// Cost already computed by the tool (e.g. Claude's `costUSD`)
    pub(crate) cost: Option<f64>,
}

impl UsageEntry {
    /// Entry with all counters zeroed, used as a builder base.
    pub(crate) fn new(origin: Origin, timestamp: DateTime<Utc>, model: impl Into<String>) -> Self {
        Self {
            origin,
            timestamp,
            model: model.into(),
            provider: None,
            input_tokens: 0,
            output_tokens: 0,
            cache_read_tokens: 0,
            cache_write_tokens: 0,
            reasoning_tokens: 0,
            cost: None,
        }
    }

    pub(crate) fn totals(&self) -> TokenTotals {
        TokenTotals {
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            cache_read: self.cache_read_tokens,
            cache_write: self.cache_write_tokens,
            reasoning_tokens: self.reasoning_tokens,
            count: 1,
        }
    }
}

/// Summed token counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct TokenTotals {
    pub(crate) input_tokens: u64,
    pub(crate) output_tokens: u64,
    pub(crate) cache_read: u64,
    pub(crate) cache_write: u64,
    pub(crate) reasoning_tokens: u64,
    pub(crate) count: u64,
}

impl TokenTotals {
    /// Counters saturate at `u64::MAX` instead of wrapping.
    pub(crate) fn add(&mut self, other: &TokenTotals) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.cache_read = self.cache_read.saturating_add(other.cache_read);
        self.cache_write = self.cache_write.saturating_add(other.cache_write);
        self.reasoning_tokens = self.reasoning_tokens.saturating_add(other.reasoning_tokens);
        self.count = self.count.saturating_add(other.count);
    }
}

/// Entries loaded from one source
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) entries: Vec<UsageEntry>,
    pub(crate) files: usize,
    /// Processing time in milliseconds
    pub(crate) elapsed_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        "2026-02-06T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn origin_implicit_providers() {
        assert_eq!(Origin::Claude.implicit_providers(), &["anthropic", "vertex_ai"]);
        assert_eq!(
            Origin::Codex.implicit_providers(),
            &["openai", "azure", "openrouter/openai"]
        );
    }

    #[test]
    fn origin_accounting_flags() {
        assert!(Origin::Codex.cache_read_included_in_input());
        assert!(!Origin::Claude.cache_read_included_in_input());
        assert!(Origin::Gemini.reasoning_billed_as_output());
        assert!(!Origin::Codex.reasoning_billed_as_output());
    }

    #[test]
    fn origin_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Origin::Codex).unwrap(), r#""codex""#);
        let o: Origin = serde_json::from_str(r#""claude""#).unwrap();
        assert_eq!(o, Origin::Claude);
    }

    #[test]
    fn new_entry_is_zeroed() {
        let e = UsageEntry::new(Origin::Claude, ts(), "claude-sonnet-4");
        assert_eq!(e.model, "claude-sonnet-4");
        assert_eq!(e.totals(), TokenTotals { count: 1, ..Default::default() });
        assert!(e.cost.is_none());
    }

    #[test]
    fn totals_add_sums_all_fields() {
        let mut a = TokenTotals {
            input_tokens: 1,
            output_tokens: 2,
            cache_read: 3,
            cache_write: 4,
            reasoning_tokens: 5,
            count: 1,
        };
        a.add(&a.clone());
        assert_eq!(a.input_tokens, 2);
        assert_eq!(a.cache_write, 8);
        assert_eq!(a.reasoning_tokens, 10);
        assert_eq!(a.count, 2);
    }

    #[test]
    fn totals_add_saturates_on_huge_counts() {
        let huge = TokenTotals {
            input_tokens: 10_000_000_000_000_000_000,
            reasoning_tokens: u64::MAX,
            count: 1,
            ..Default::default()
        };
        let mut total = huge;
        total.add(&huge);
        assert_eq!(total.input_tokens, u64::MAX);
        assert_eq!(total.reasoning_tokens, u64::MAX);
        assert_eq!(total.count, 2);
    }
}
