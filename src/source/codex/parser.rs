//! OpenAI Codex CLI JSONL parser
//!
//! Parses JSONL logs from ~/.codex/sessions/ directory.
//! Codex log format uses cumulative token counts that need delta computation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::core::{Origin, UsageEntry};

use super::delta::{CodexDelta, CodexEvent, CodexStream, RawCumulativeUsage};

const DEFAULT_CODEX_DIR: &str = ".codex";
const CODEX_HOME_ENV: &str = "CODEX_HOME";
const SESSION_SUBDIR: &str = "sessions";

// ============================================================================
// Internal types for JSONL parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawJsonEntry {
    timestamp: Option<String>,
    #[serde(rename = "type")]
    entry_type: Option<String>,
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(rename = "type")]
    payload_type: Option<String>,
    info: Option<TokenInfo>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    total_token_usage: Option<RawCumulativeUsage>,
    last_token_usage: Option<RawCumulativeUsage>,
    model: Option<String>,
    model_name: Option<String>,
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    model: Option<String>,
}

// ============================================================================
// File discovery
// ============================================================================

fn get_codex_sessions_dir() -> Option<PathBuf> {
    // Check CODEX_HOME env var first
    if let Ok(codex_home) = env::var(CODEX_HOME_ENV) {
        let path = PathBuf::from(codex_home).join(SESSION_SUBDIR);
        if path.is_dir() {
            return Some(path);
        }
    }

    // Fall back to ~/.codex/sessions
    let home = dirs::home_dir()?;
    let path = home.join(DEFAULT_CODEX_DIR).join(SESSION_SUBDIR);
    path.is_dir().then_some(path)
}

pub(super) fn find_codex_files() -> Vec<PathBuf> {
    let Some(sessions_dir) = get_codex_sessions_dir() else {
        return Vec::new();
    };

    let mut files = Vec::new();
    if let Ok(entries) = glob::glob(&format!("{}/**/*.jsonl", sessions_dir.display())) {
        for entry in entries.flatten() {
            files.push(entry);
        }
    }
    files
}

// ============================================================================
// Parsing
// ============================================================================

fn extract_model(payload: &Payload) -> Option<String> {
    let info = payload.info.as_ref();
    [
        info.and_then(|i| i.model.as_ref()),
        info.and_then(|i| i.model_name.as_ref()),
        info.and_then(|i| i.metadata.as_ref())
            .and_then(|m| m.model.as_ref()),
        payload.model.as_ref(),
    ]
    .into_iter()
    .flatten()
    .find(|m| !m.trim().is_empty())
    .cloned()
}

/// Map one JSONL line to a usage-relevant event.
fn parse_line(line: &str) -> Result<Option<CodexEvent>, serde_json::Error> {
    let raw: RawJsonEntry = serde_json::from_str(line)?;
    let Some(payload) = raw.payload else {
        return Ok(None);
    };

    let event = match raw.entry_type.as_deref() {
        Some("turn_context") => Some(CodexEvent::Context {
            model: extract_model(&payload),
        }),
        Some("event_msg") if payload.payload_type.as_deref() == Some("token_count") => {
            let model = extract_model(&payload);
            payload.info.map(|info| CodexEvent::Usage {
                timestamp: raw
                    .timestamp
                    .as_deref()
                    .and_then(|ts| ts.parse::<DateTime<Utc>>().ok()),
                model,
                total: info.total_token_usage,
                last: info.last_token_usage,
            })
        }
        _ => None,
    };
    Ok(event)
}

fn to_usage_entry(delta: CodexDelta, timestamp: DateTime<Utc>) -> UsageEntry {
    let mut entry = UsageEntry::new(Origin::Codex, timestamp, delta.model);
    // Codex's input_tokens includes cached_input_tokens and output_tokens
    // includes reasoning_output_tokens; the calculator accounts for both.
    entry.input_tokens = delta.usage.input_tokens;
    entry.cache_read_tokens = delta.usage.cached_input_tokens;
    entry.output_tokens = delta.usage.output_tokens;
    entry.reasoning_tokens = delta.usage.reasoning_output_tokens;
    entry
}

/// Parse an already-open session log; one [`CodexStream`] per call.
pub(super) fn parse_codex_reader<R: BufRead>(reader: R, label: &str) -> Vec<UsageEntry> {
    let mut stream = CodexStream::new();
    let mut entries = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::debug!(file = label, line = line_no + 1, error = %err, "failed to read line");
                continue;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = match parse_line(trimmed) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                tracing::debug!(file = label, line = line_no + 1, error = %err, "invalid JSON");
                continue;
            }
        };

        let Some(delta) = stream.observe(event) else {
            continue;
        };
        // The baseline above has already advanced; only the entry is lost.
        let Some(timestamp) = delta.timestamp else {
            tracing::debug!(file = label, line = line_no + 1, "token_count without a valid timestamp");
            continue;
        };
        entries.push(to_usage_entry(delta, timestamp));
    }

    entries
}

pub(super) fn parse_codex_file(path: &Path) -> Vec<UsageEntry> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "failed to open session file");
            return Vec::new();
        }
    };
    let label = path.display().to_string();
    parse_codex_reader(BufReader::new(file), &label)
}
