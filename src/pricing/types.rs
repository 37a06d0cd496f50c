use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::core::coerce_rate;

const INPUT_KEY: &str = "input_cost_per_token";
const OUTPUT_KEY: &str = "output_cost_per_token";
const CACHE_WRITE_KEY: &str = "cache_creation_input_token_cost";
const CACHE_READ_KEY: &str = "cache_read_input_token_cost";
const ABOVE_THRESHOLD_SUFFIX: &str = "_above_200k_tokens";

/// Model rate card (per token, not per million)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub(crate) struct PricingRecord {
    pub(crate) input: Option<f64>,
    pub(crate) output: Option<f64>,
    pub(crate) cache_write: Option<f64>,
    pub(crate) cache_read: Option<f64>,
    pub(crate) input_above_threshold: Option<f64>,
    pub(crate) output_above_threshold: Option<f64>,
    pub(crate) cache_write_above_threshold: Option<f64>,
    pub(crate) cache_read_above_threshold: Option<f64>,
}

impl PricingRecord {
    /// Read a LiteLLM rate card. Returns `None` when the value is not an object.
    pub(crate) fn from_litellm(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let rate = |key: &str| obj.get(key).and_then(coerce_rate);
        let above = |key: &str| rate(&format!("{key}{ABOVE_THRESHOLD_SUFFIX}"));

        Some(Self {
            input: rate(INPUT_KEY),
            output: rate(OUTPUT_KEY),
            cache_write: rate(CACHE_WRITE_KEY),
            cache_read: rate(CACHE_READ_KEY),
            input_above_threshold: above(INPUT_KEY),
            output_above_threshold: above(OUTPUT_KEY),
            cache_write_above_threshold: above(CACHE_WRITE_KEY),
            cache_read_above_threshold: above(CACHE_READ_KEY),
        })
    }
}

/// Pricing catalog keyed by catalog name (usually `provider/model`).
///
/// Keys iterate in sorted order so every scan over the catalog is deterministic.
/// `serde_json::Map` is itself sorted, so payload order is gone by the time a
/// catalog is built from a fetch or from the cache file.
#[derive(Debug, Clone, Default)]
pub(crate) struct PricingCatalog {
    models: BTreeMap<String, PricingRecord>,
}

impl PricingCatalog {
    pub(crate) fn from_litellm(data: &Map<String, Value>) -> Self {
        let models = data
            .iter()
            .filter_map(|(name, value)| {
                PricingRecord::from_litellm(value).map(|record| (name.clone(), record))
            })
            .collect();
        Self { models }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &str) -> Option<&PricingRecord> {
        self.models.get(key)
    }

    pub(crate) fn get_key_value(&self, key: &str) -> Option<(&str, &PricingRecord)> {
        self.models.get_key_value(key).map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &PricingRecord)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn len(&self) -> usize {
        self.models.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, PricingRecord)> for PricingCatalog {
    fn from_iter<I: IntoIterator<Item = (K, PricingRecord)>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
