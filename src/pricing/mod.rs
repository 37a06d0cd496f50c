//! Usage-to-cost resolution
//!
//! Acquires the LiteLLM pricing catalog, resolves model names against it and
//! prices token counts with tiered rates.

mod cache;
mod calculator;
mod estimator;
mod loader;
mod provider;
mod resolver;
mod types;

pub(crate) use calculator::TIER_THRESHOLD;
pub(crate) use estimator::{CostEstimator, CostSummary};
pub(crate) use loader::{PricingConfig, PricingLoader, PricingSource, PricingStatus};
pub(crate) use resolver::{ModelResolver, Resolved};
pub(crate) use types::{PricingCatalog, PricingRecord};
