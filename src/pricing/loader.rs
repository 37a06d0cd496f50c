use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cache::{CachedCatalog, JsonFileStore, read_cache, write_cache};
use super::provider::{CatalogFetcher, HttpFetcher, LITELLM_PRICING_URL};
use super::types::PricingCatalog;

pub(crate) const PRICING_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("tokcost/", env!("CARGO_PKG_VERSION"));

/// Time source for cache freshness checks.
pub(crate) trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Where a catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum PricingSource {
    /// Cache younger than the freshness window, used because the fetch failed
    FreshCache,
    /// Fetched over the network just now
    Remote,
    /// Cache older than the freshness window, used because the fetch failed
    StaleCache,
    /// Cache read in offline mode
    OfflineCache,
    /// Offline mode with no usable cache
    OfflineEmpty,
    /// Fetch failed and no cache exists
    Unavailable,
}

impl PricingSource {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PricingSource::FreshCache => "fresh-cache",
            PricingSource::Remote => "remote",
            PricingSource::StaleCache => "stale-cache",
            PricingSource::OfflineCache => "offline-cache",
            PricingSource::OfflineEmpty => "offline-empty",
            PricingSource::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for PricingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one acquisition attempt
#[derive(Debug, Clone)]
pub(crate) struct PricingStatus {
    pub(crate) catalog: PricingCatalog,
    pub(crate) is_empty: bool,
    pub(crate) source: PricingSource,
}

impl PricingStatus {
    fn new(catalog: PricingCatalog, source: PricingSource) -> Self {
        Self {
            is_empty: catalog.is_empty(),
            catalog,
            source,
        }
    }
}

/// Settings for catalog acquisition
#[derive(Debug, Clone)]
pub(crate) struct PricingConfig {
    pub(crate) url: String,
    pub(crate) user_agent: String,
    pub(crate) cache_path: PathBuf,
    pub(crate) freshness: Duration,
    pub(crate) fetch_timeout: Duration,
}

impl PricingConfig {
    pub(crate) fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            url: LITELLM_PRICING_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            cache_path: cache_path.into(),
            freshness: PRICING_CACHE_TTL,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}

/// Acquires the pricing catalog through the fetch → cache fallback chain.
pub(crate) struct PricingLoader<F, C> {
    store: JsonFileStore,
    freshness: Duration,
    fetcher: F,
    clock: C,
}

impl PricingLoader<HttpFetcher, SystemClock> {
    pub(crate) fn from_config(config: &PricingConfig) -> Self {
        let fetcher = HttpFetcher::new(
            config.url.as_str(),
            config.user_agent.as_str(),
            config.fetch_timeout,
        );
        Self::new(config, fetcher, SystemClock)
    }
}

impl<F: CatalogFetcher, C: Clock> PricingLoader<F, C> {
    pub(crate) fn new(config: &PricingConfig, fetcher: F, clock: C) -> Self {
        Self {
            store: JsonFileStore::new(config.cache_path.as_path()),
            freshness: config.freshness,
            fetcher,
            clock,
        }
    }

    pub(crate) fn cache_path(&self) -> &Path {
        self.store.path()
    }

    pub(crate) fn acquire(&self, offline: bool) -> PricingStatus {
        if offline {
            return self.acquire_offline();
        }

        let now = self.clock.now();
        let fresh = read_cache(&self.store).filter(|c| c.is_fresh(now, self.freshness));

        match self.fetcher.fetch() {
            Ok(data) => {
                if let Err(err) = write_cache(&self.store, &data, now) {
                    tracing::warn!(
                        path = %self.store.path().display(),
                        error = %err,
                        "failed to save pricing cache"
                    );
                }
                let catalog = PricingCatalog::from_litellm(&data);
                tracing::debug!(models = catalog.len(), "fetched pricing catalog");
                return PricingStatus::new(catalog, PricingSource::Remote);
            }
            Err(err) => {
                tracing::warn!(error = %err, "pricing fetch failed, falling back to cache");
            }
        }

        if let Some(cached) = fresh {
            log_cache_age(&cached, now);
            return PricingStatus::new(
                PricingCatalog::from_litellm(&cached.data),
                PricingSource::FreshCache,
            );
        }

        if let Some(cached) = read_cache(&self.store) {
            log_cache_age(&cached, now);
            return PricingStatus::new(
                PricingCatalog::from_litellm(&cached.data),
                PricingSource::StaleCache,
            );
        }

        PricingStatus::new(PricingCatalog::default(), PricingSource::Unavailable)
    }

    fn acquire_offline(&self) -> PricingStatus {
        let catalog = read_cache(&self.store)
            .map(|cached| PricingCatalog::from_litellm(&cached.data))
            .filter(|catalog| !catalog.is_empty());

        match catalog {
            Some(catalog) => PricingStatus::new(catalog, PricingSource::OfflineCache),
            None => PricingStatus::new(PricingCatalog::default(), PricingSource::OfflineEmpty),
        }
    }
}

fn log_cache_age(cached: &CachedCatalog, now: DateTime<Utc>) {
    match cached.age(now) {
        Some(age) => tracing::debug!(hours = age.num_minutes() as f64 / 60.0, "using cached pricing"),
        None => tracing::debug!("using cached pricing with unknown age"),
    }
}
