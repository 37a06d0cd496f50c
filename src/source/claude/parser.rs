//! Claude Code JSONL parser
//!
//! Parses JSONL logs from ~/.claude/projects/ directory.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::core::{Origin, UsageEntry, lenient_rate, lenient_tokens};

const CLAUDE_CONFIG_ENV: &str = "CLAUDE_CONFIG_DIR";
const DEFAULT_CLAUDE_DIR: &str = ".claude";
const PROJECTS_SUBDIR: &str = "projects";
const SYNTHETIC_MODEL: &str = "<synthetic>";

// ============================================================================
// Internal types for JSONL parsing
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLine {
    timestamp: Option<String>,
    request_id: Option<String>,
    #[serde(rename = "costUSD", default, deserialize_with = "lenient_rate")]
    cost_usd: Option<f64>,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    id: Option<String>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default, deserialize_with = "lenient_tokens")]
    input_tokens: u64,
    #[serde(default, deserialize_with = "lenient_tokens")]
    output_tokens: u64,
    #[serde(default, deserialize_with = "lenient_tokens")]
    cache_creation_input_tokens: u64,
    #[serde(default, deserialize_with = "lenient_tokens")]
    cache_read_input_tokens: u64,
}

// ============================================================================
// File discovery
// ============================================================================

fn get_claude_projects_dir() -> Option<PathBuf> {
    if let Ok(config_dir) = env::var(CLAUDE_CONFIG_ENV) {
        let path = PathBuf::from(config_dir).join(PROJECTS_SUBDIR);
        if path.is_dir() {
            return Some(path);
        }
    }

    let home = dirs::home_dir()?;
    let path = home.join(DEFAULT_CLAUDE_DIR).join(PROJECTS_SUBDIR);
    path.is_dir().then_some(path)
}

pub(super) fn find_claude_files() -> Vec<PathBuf> {
    let Some(projects_dir) = get_claude_projects_dir() else {
        return Vec::new();
    };

    let mut files = Vec::new();
    if let Ok(entries) = glob::glob(&format!("{}/**/*.jsonl", projects_dir.display())) {
        for entry in entries.flatten() {
            files.push(entry);
        }
    }
    files
}

// ============================================================================
// Parsing
// ============================================================================

/// Streaming writes the same message several times; key on message + request id.
fn dedup_key(line: &RawLine) -> Option<String> {
    let message_id = line.message.as_ref()?.id.as_deref()?;
    Some(match &line.request_id {
        Some(request_id) => format!("{message_id}:{request_id}"),
        None => message_id.to_string(),
    })
}

fn parse_entry(line: RawLine) -> Option<UsageEntry> {
    let timestamp = line.timestamp.as_deref()?.parse::<DateTime<Utc>>().ok()?;
    let message = line.message?;
    let usage = message.usage?;

    let model = message.model.map(|m| m.trim().to_string())?;
    if model.is_empty() || model == SYNTHETIC_MODEL {
        return None;
    }

    let mut entry = UsageEntry::new(Origin::Claude, timestamp, model);
    entry.input_tokens = usage.input_tokens;
    entry.output_tokens = usage.output_tokens;
    entry.cache_write_tokens = usage.cache_creation_input_tokens;
    entry.cache_read_tokens = usage.cache_read_input_tokens;
    entry.cost = line.cost_usd;
    Some(entry)
}

pub(super) fn parse_claude_reader<R: BufRead>(reader: R, label: &str) -> Vec<UsageEntry> {
    let mut entries: Vec<UsageEntry> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::debug!(file = label, line = line_no + 1, error = %err, "failed to read line");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let raw: RawLine = match serde_json::from_str(&line) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(file = label, line = line_no + 1, error = %err, "invalid JSON");
                continue;
            }
        };

        let key = dedup_key(&raw);
        let Some(entry) = parse_entry(raw) else {
            continue;
        };

        // Later writes of a streamed message carry the final counts.
        match key {
            Some(k) => match seen.get(&k) {
                Some(&idx) => entries[idx] = entry,
                None => {
                    seen.insert(k, entries.len());
                    entries.push(entry);
                }
            },
            None => entries.push(entry),
        }
    }
    entries
}

pub(super) fn parse_claude_file(path: &Path) -> Vec<UsageEntry> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "failed to open project log");
            return Vec::new();
        }
    };
    let label = path.display().to_string();
    parse_claude_reader(BufReader::new(file), &label)
}
