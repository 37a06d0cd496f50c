//! Data source abstraction layer
//!
//! Each CLI tool (Claude, Codex, etc.) implements the Source trait
//! to turn its native log files into usage entries.

pub(crate) mod claude;
pub(crate) mod codex;
pub(crate) mod loader;
pub(crate) mod registry;

use std::path::{Path, PathBuf};

use crate::core::{Origin, UsageEntry};

/// Data source trait - implemented by each CLI tool
pub(crate) trait Source: Send + Sync {
    /// Unique name for this source (used in CLI subcommands)
    fn name(&self) -> &'static str;

    /// Display name for output
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Origin tag stamped on every entry
    fn origin(&self) -> Origin;

    /// Find all data files for this source
    fn find_files(&self) -> Vec<PathBuf>;

    /// Parse a single file into usage entries, in file order
    fn parse_file(&self, path: &Path) -> Vec<UsageEntry>;
}

/// Box type for dynamic dispatch
pub(crate) type BoxedSource = Box<dyn Source>;

pub(crate) use loader::load_entries;
pub(crate) use registry::get_source;
