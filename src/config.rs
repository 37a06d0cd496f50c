use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{APP_DIR, HOME_ENV, PRICING_CACHE_FILE};
use crate::error::PricingError;
use crate::pricing::PricingConfig;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) offline: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) pricing_url: Option<String>,
    #[serde(default)]
    pub(crate) cache_ttl_hours: Option<u64>,
    #[serde(default)]
    pub(crate) fetch_timeout_secs: Option<u64>,
}

impl Config {
    /// Runs before logging is set up, so problems go straight to stderr.
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("Warning: Failed to parse {}: {}", path.display(), e),
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/tokcost/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join(APP_DIR).join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join(APP_DIR).join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.tokcost.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tokcost.toml"));
        }

        paths
    }

    /// Acquisition settings with this file's overrides applied.
    pub(crate) fn pricing_config(&self) -> Result<PricingConfig, PricingError> {
        let mut pricing = PricingConfig::new(pricing_cache_path()?);
        if let Some(url) = self.pricing_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            pricing.url = url.to_string();
        }
        if let Some(hours) = self.cache_ttl_hours {
            pricing.freshness = Duration::from_secs(hours.saturating_mul(60 * 60));
        }
        if let Some(secs) = self.fetch_timeout_secs.filter(|s| *s > 0) {
            pricing.fetch_timeout = Duration::from_secs(secs);
        }
        Ok(pricing)
    }
}

/// `$TOKCOST_HOME/tokcost/pricing-cache.json`, or the same under the
/// platform config dir.
pub(crate) fn pricing_cache_path() -> Result<PathBuf, PricingError> {
    let base = env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or(PricingError::NoCacheDir)?;
    Ok(base.join(APP_DIR).join(PRICING_CACHE_FILE))
}
