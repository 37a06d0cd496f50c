use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::{Origin, TokenTotals, UsageEntry};

use super::calculator::entry_cost;
use super::resolver::ModelResolver;
use super::types::{PricingCatalog, PricingRecord};

/// Cost of one entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CostEstimate {
    /// Cost reported by the tool itself
    Known(f64),
    /// Cost computed from the pricing catalog
    Estimated(f64),
    /// No catalog entry matched the model
    Unknown,
}

impl CostEstimate {
    pub(crate) fn amount(self) -> Option<f64> {
        match self {
            CostEstimate::Known(cost) | CostEstimate::Estimated(cost) => Some(cost),
            CostEstimate::Unknown => None,
        }
    }
}

/// Per-model totals
#[derive(Debug, Default, Clone, Serialize)]
pub(crate) struct ModelCost {
    pub(crate) tokens: TokenTotals,
    pub(crate) cost: f64,
    /// Entries whose cost could not be determined
    pub(crate) unknown_entries: u64,
}

/// Costs for a batch of entries
#[derive(Debug, Default, Clone, Serialize)]
pub(crate) struct CostSummary {
    pub(crate) total_cost: f64,
    pub(crate) tokens: TokenTotals,
    pub(crate) unknown_entries: u64,
    pub(crate) unknown_models: BTreeSet<String>,
    pub(crate) models: BTreeMap<String, ModelCost>,
}

type ResolveKey = (Origin, Option<String>, String);

/// Prices usage entries against a catalog, memoizing model resolution.
pub(crate) struct CostEstimator<'a> {
    catalog: &'a PricingCatalog,
    resolver: &'a ModelResolver,
    resolved: RefCell<HashMap<ResolveKey, Option<PricingRecord>>>,
}

impl<'a> CostEstimator<'a> {
    pub(crate) fn new(catalog: &'a PricingCatalog, resolver: &'a ModelResolver) -> Self {
        Self {
            catalog,
            resolver,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    fn pricing_for(&self, entry: &UsageEntry) -> Option<PricingRecord> {
        let key = (entry.origin, entry.provider.clone(), entry.model.clone());
        if let Some(cached) = self.resolved.borrow().get(&key) {
            return *cached;
        }

        let record = match self.resolver.resolve(self.catalog, entry) {
            Some(resolved) => {
                tracing::debug!(
                    model = %entry.model,
                    key = resolved.key,
                    tier = resolved.tier.as_str(),
                    "resolved pricing"
                );
                Some(*resolved.record)
            }
            None => {
                tracing::debug!(model = %entry.model, origin = %entry.origin, "no pricing for model");
                None
            }
        };
        self.resolved.borrow_mut().insert(key, record);
        record
    }

    pub(crate) fn estimate(&self, entry: &UsageEntry) -> CostEstimate {
        if let Some(cost) = entry.cost.filter(|c| c.is_finite()) {
            return CostEstimate::Known(cost);
        }
        match self.pricing_for(entry) {
            Some(record) => CostEstimate::Estimated(entry_cost(&record, entry)),
            None => CostEstimate::Unknown,
        }
    }

    pub(crate) fn summarize(&self, entries: &[UsageEntry]) -> CostSummary {
        let mut summary = CostSummary::default();
        for entry in entries {
            let totals = entry.totals();
            let model = summary.models.entry(entry.model.clone()).or_default();
            model.tokens.add(&totals);
            summary.tokens.add(&totals);

            match self.estimate(entry).amount() {
                Some(cost) => {
                    model.cost += cost;
                    summary.total_cost += cost;
                }
                None => {
                    model.unknown_entries += 1;
                    summary.unknown_entries += 1;
                    summary.unknown_models.insert(entry.model.clone());
                }
            }
        }
        summary
    }
}
