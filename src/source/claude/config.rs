//! Claude Code data source configuration
//!
//! Defines the ClaudeSource implementation of the Source trait.

use std::path::{Path, PathBuf};

use crate::core::{Origin, UsageEntry};
use crate::source::Source;

use super::parser::{find_claude_files, parse_claude_file};

/// Claude data source
#[derive(Debug, Default)]
pub(crate) struct ClaudeSource;

impl Source for ClaudeSource {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn display_name(&self) -> &'static str {
        "Claude Code"
    }

    fn origin(&self) -> Origin {
        Origin::Claude
    }

    fn find_files(&self) -> Vec<PathBuf> {
        find_claude_files()
    }

    fn parse_file(&self, path: &Path) -> Vec<UsageEntry> {
        parse_claude_file(path)
    }
}
