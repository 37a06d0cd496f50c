//! Unified data loader for all sources

use rayon::prelude::*;
use std::time::Instant;

use crate::core::LoadResult;
use crate::source::Source;

/// Discover and parse every file of a source.
///
/// Files are parsed in parallel; each file is one log stream and is read
/// sequentially by its parser. Entries come back ordered by timestamp.
pub(crate) fn load_entries(source: &dyn Source) -> LoadResult {
    let start = Instant::now();
    let files = source.find_files();
    if files.is_empty() {
        tracing::debug!(source = source.name(), "no log files found");
        return LoadResult::default();
    }

    let mut entries: Vec<_> = files
        .par_iter()
        .map(|path| source.parse_file(path))
        .reduce(Vec::new, |mut acc, mut partial| {
            acc.append(&mut partial);
            acc
        });
    entries.sort_by_key(|e| e.timestamp);

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!(
        source = source.name(),
        origin = %source.origin(),
        files = files.len(),
        entries = entries.len(),
        elapsed_ms,
        "loaded usage entries"
    );

    LoadResult {
        entries,
        files: files.len(),
        elapsed_ms,
    }
}
