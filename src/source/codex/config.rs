//! OpenAI Codex CLI data source configuration
//!
//! Defines the CodexSource implementation of the Source trait.

use std::path::{Path, PathBuf};

use crate::core::{Origin, UsageEntry};
use crate::source::Source;

use super::parser::{find_codex_files, parse_codex_file};

/// Codex data source
#[derive(Debug, Default)]
pub(crate) struct CodexSource;

impl Source for CodexSource {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn display_name(&self) -> &'static str {
        "OpenAI Codex"
    }

    fn origin(&self) -> Origin {
        Origin::Codex
    }

    fn find_files(&self) -> Vec<PathBuf> {
        find_codex_files()
    }

    fn parse_file(&self, path: &Path) -> Vec<UsageEntry> {
        parse_codex_file(path)
    }
}
