/// Model assumed for Codex usage when no log line names one
pub(crate) const FALLBACK_CODEX_MODEL: &str = "gpt-5";

/// Application directory name under the config dir
pub(crate) const APP_DIR: &str = "tokcost";

/// Overrides the config dir holding the pricing cache
pub(crate) const HOME_ENV: &str = "TOKCOST_HOME";

pub(crate) const PRICING_CACHE_FILE: &str = "pricing-cache.json";
