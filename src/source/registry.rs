//! Data source registry
//!
//! Manages all available data sources and provides lookup by name.

use std::sync::LazyLock;

use super::claude::ClaudeSource;
use super::codex::CodexSource;
use super::{BoxedSource, Source};

/// All registered data sources
static SOURCES: LazyLock<Vec<BoxedSource>> =
    LazyLock::new(|| vec![Box::new(ClaudeSource), Box::new(CodexSource)]);

pub(crate) fn all_sources() -> impl Iterator<Item = &'static dyn Source> {
    SOURCES.iter().map(|s| s.as_ref())
}

/// Get a source by name
pub(crate) fn get_source(name: &str) -> Option<&'static dyn Source> {
    let name_lower = name.to_lowercase();
    all_sources().find(|s| s.name() == name_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Origin;

    #[test]
    fn test_get_source_by_name() {
        assert_eq!(get_source("claude").map(|s| s.origin()), Some(Origin::Claude));
        assert_eq!(get_source("Codex").map(|s| s.origin()), Some(Origin::Codex));
        assert!(get_source("unknown").is_none());
    }

    #[test]
    fn test_all_sources_listed() {
        let names: Vec<&str> = all_sources().map(|s| s.name()).collect();
        assert_eq!(names, vec!["claude", "codex"]);
    }
}
