//! Cumulative-to-delta reconstruction for Codex session logs
//!
//! Codex writes running totals (`total_token_usage`) on every `token_count`
//! event and repeats identical totals across events. Subtracting the previous
//! total yields the per-event usage; repeated snapshots collapse to zero and
//! are dropped.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::consts::FALLBACK_CODEX_MODEL;
use crate::core::lenient_tokens;

/// One token usage snapshot, either running totals or a single turn
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct RawCumulativeUsage {
    #[serde(default, deserialize_with = "lenient_tokens")]
    pub(super) input_tokens: u64,
    #[serde(
        default,
        alias = "cache_read_input_tokens",
        deserialize_with = "lenient_tokens"
    )]
    pub(super) cached_input_tokens: u64,
    #[serde(default, deserialize_with = "lenient_tokens")]
    pub(super) output_tokens: u64,
    #[serde(default, deserialize_with = "lenient_tokens")]
    pub(super) reasoning_output_tokens: u64,
    #[serde(default, deserialize_with = "lenient_tokens")]
    pub(super) total_tokens: u64,
}

impl RawCumulativeUsage {
    pub(super) fn subtract(&self, prev: &RawCumulativeUsage) -> RawCumulativeUsage {
        RawCumulativeUsage {
            input_tokens: self.input_tokens.saturating_sub(prev.input_tokens),
            cached_input_tokens: self.cached_input_tokens.saturating_sub(prev.cached_input_tokens),
            output_tokens: self.output_tokens.saturating_sub(prev.output_tokens),
            reasoning_output_tokens: self
                .reasoning_output_tokens
                .saturating_sub(prev.reasoning_output_tokens),
            total_tokens: self.total_tokens.saturating_sub(prev.total_tokens),
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.input_tokens == 0
            && self.cached_input_tokens == 0
            && self.output_tokens == 0
            && self.reasoning_output_tokens == 0
            && self.total_tokens == 0
    }
}

/// Codex log event relevant to usage accounting
#[derive(Debug, Clone, PartialEq)]
pub(super) enum CodexEvent {
    /// `turn_context` line announcing the active model
    Context { model: Option<String> },
    /// `token_count` line
    Usage {
        timestamp: Option<DateTime<Utc>>,
        model: Option<String>,
        total: Option<RawCumulativeUsage>,
        last: Option<RawCumulativeUsage>,
    },
}

/// Per-event usage produced by [`CodexStream`]
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CodexDelta {
    pub(super) timestamp: Option<DateTime<Utc>>,
    pub(super) model: String,
    pub(super) usage: RawCumulativeUsage,
}

/// State for one session file. Events must be fed in file order.
#[derive(Debug, Default)]
pub(super) struct CodexStream {
    previous_totals: Option<RawCumulativeUsage>,
    current_model: Option<String>,
}

impl CodexStream {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn observe(&mut self, event: CodexEvent) -> Option<CodexDelta> {
        match event {
            CodexEvent::Context { model } => {
                if let Some(model) = non_blank(model) {
                    self.current_model = Some(model);
                }
                None
            }
            CodexEvent::Usage {
                timestamp,
                model,
                total,
                last,
            } => {
                let usage = match (total, last) {
                    (Some(total), _) => {
                        let delta = match &self.previous_totals {
                            Some(prev) => total.subtract(prev),
                            None => total,
                        };
                        self.previous_totals = Some(total);
                        delta
                    }
                    // Already a delta; the cumulative baseline stays put.
                    (None, Some(last)) => last,
                    (None, None) => return None,
                };

                if let Some(model) = non_blank(model) {
                    self.current_model = Some(model);
                }

                if usage.is_empty() {
                    return None;
                }

                let model = self
                    .current_model
                    .clone()
                    .unwrap_or_else(|| FALLBACK_CODEX_MODEL.to_string());
                Some(CodexDelta {
                    timestamp,
                    model,
                    usage,
                })
            }
        }
    }
}

fn non_blank(model: Option<String>) -> Option<String> {
    model
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}
