use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PricingError;

/// Whole-file JSON document store.
///
/// No locking: concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn read<T: for<'de> Deserialize<'de>>(&self) -> Result<T, PricingError> {
        let file = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub(crate) fn write<T: Serialize>(&self, value: &T) -> Result<(), PricingError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer(file, value)?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheFileOut<'a> {
    fetched_at: String,
    data: &'a Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheFileIn {
    #[serde(default)]
    fetched_at: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

/// Catalog snapshot read back from the pricing cache file
#[derive(Debug, Clone)]
pub(crate) struct CachedCatalog {
    /// `None` when the stamp is missing or unparseable
    pub(crate) fetched_at: Option<DateTime<Utc>>,
    pub(crate) data: Map<String, Value>,
}

impl CachedCatalog {
    /// Fresh when stamped less than `window` before `now`.
    pub(crate) fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let Some(fetched_at) = self.fetched_at else {
            return false;
        };
        let window = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
        now.signed_duration_since(fetched_at) < window
    }

    pub(crate) fn age(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.fetched_at.map(|t| now.signed_duration_since(t))
    }
}

/// Read the cache file. Missing, unreadable or malformed files are a cache miss.
pub(crate) fn read_cache(store: &JsonFileStore) -> Option<CachedCatalog> {
    let raw: CacheFileIn = match store.read() {
        Ok(raw) => raw,
        Err(PricingError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %store.path().display(), "no pricing cache");
            return None;
        }
        Err(err) => {
            tracing::debug!(path = %store.path().display(), error = %err, "ignoring unreadable pricing cache");
            return None;
        }
    };

    let Some(Value::Object(data)) = raw.data else {
        tracing::debug!(path = %store.path().display(), "pricing cache has no data object");
        return None;
    };

    let fetched_at = raw
        .fetched_at
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));

    Some(CachedCatalog { fetched_at, data })
}

/// Overwrite the cache file with `data` stamped at `now`.
pub(crate) fn write_cache(
    store: &JsonFileStore,
    data: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<(), PricingError> {
    store.write(&CacheFileOut {
        fetched_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        data,
    })
}
