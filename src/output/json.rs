use serde_json::json;
use std::path::Path;

use crate::core::{LoadResult, Origin};
use crate::pricing::{CostSummary, PricingStatus, Resolved};

fn pricing_value(status: &PricingStatus) -> serde_json::Value {
    json!({
        "source": status.source,
        "models": status.catalog.len(),
        "empty": status.is_empty,
    })
}

pub(crate) fn output_cost_json(
    source: &str,
    summary: &CostSummary,
    loaded: &LoadResult,
    status: &PricingStatus,
) -> Result<String, serde_json::Error> {
    let output = json!({
        "source": source,
        "pricing": pricing_value(status),
        "files": loaded.files,
        "total_cost": summary.total_cost,
        "tokens": summary.tokens,
        "unknown_entries": summary.unknown_entries,
        "unknown_models": summary.unknown_models,
        "models": summary.models,
    });
    serde_json::to_string_pretty(&output)
}

pub(crate) fn output_pricing_json(status: &PricingStatus, cache_path: &Path) -> Result<String, serde_json::Error> {
    let mut output = pricing_value(status);
    output["cache_path"] = json!(cache_path.display().to_string());
    serde_json::to_string_pretty(&output)
}

pub(crate) fn output_lookup_json(
    model: &str,
    origin: Origin,
    resolved: &Resolved<'_>,
) -> Result<String, serde_json::Error> {
    let output = json!({
        "model": model,
        "origin": origin,
        "key": resolved.key,
        "tier": resolved.tier.as_str(),
        "rates": resolved.record,
    });
    serde_json::to_string_pretty(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UsageEntry;
    use crate::pricing::{CostEstimator, ModelResolver, PricingCatalog, PricingRecord, PricingSource};
    use serde_json::Value;

    fn catalog() -> PricingCatalog {
        [(
            "openai/gpt-4",
            PricingRecord {
                input: Some(0.00003),
                output: Some(0.00006),
                ..Default::default()
            },
        )]
        .into_iter()
        .collect()
    }

    fn status(catalog: PricingCatalog) -> PricingStatus {
        PricingStatus {
            is_empty: catalog.is_empty(),
            catalog,
            source: PricingSource::OfflineCache,
        }
    }

    #[test]
    fn cost_json_reports_unknowns_and_source() {
        let status = status(catalog());
        let resolver = ModelResolver::default();
        let estimator = CostEstimator::new(&status.catalog, &resolver);

        let ts = "2026-02-06T10:00:00Z".parse().unwrap();
        let mut known = UsageEntry::new(Origin::Codex, ts, "gpt-4");
        known.input_tokens = 100_000;
        known.output_tokens = 50_000;
        let unknown = UsageEntry::new(Origin::Codex, ts, "mystery");
        let loaded = LoadResult {
            entries: vec![known, unknown],
            files: 1,
            elapsed_ms: 0.0,
        };
        let summary = estimator.summarize(&loaded.entries);

        let json: Value =
            serde_json::from_str(&output_cost_json("codex", &summary, &loaded, &status).unwrap()).unwrap();
        assert_eq!(json["source"], "codex");
        assert_eq!(json["pricing"]["source"], "offline-cache");
        assert_eq!(json["pricing"]["models"], 1);
        assert!((json["total_cost"].as_f64().unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(json["unknown_entries"], 1);
        assert_eq!(json["unknown_models"][0], "mystery");
        assert_eq!(json["models"]["gpt-4"]["tokens"]["input_tokens"], 100_000);
    }

    #[test]
    fn lookup_json_includes_rates() {
        let catalog = catalog();
        let resolver = ModelResolver::default();
        let resolved = resolver
            .resolve_model(&catalog, "gpt-4", None, Origin::Codex)
            .unwrap();

        let json: Value =
            serde_json::from_str(&output_lookup_json("gpt-4", Origin::Codex, &resolved).unwrap()).unwrap();
        assert_eq!(json["key"], "openai/gpt-4");
        assert_eq!(json["tier"], "exact");
        assert_eq!(json["origin"], "codex");
        assert_eq!(json["rates"]["input"], 0.00003);
        assert!(json["rates"]["cache_read"].is_null());
    }

    #[test]
    fn pricing_json_has_cache_path() {
        let json: Value = serde_json::from_str(
            &output_pricing_json(&status(PricingCatalog::default()), Path::new("/tmp/p.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["source"], "offline-cache");
        assert_eq!(json["empty"], true);
        assert_eq!(json["cache_path"], "/tmp/p.json");
    }
}
