//! Model identifier resolution
//!
//! Catalog keys are provider-qualified and versioned inconsistently, so a raw
//! model name from a log is expanded into candidate keys and matched through
//! three strategies tried strictly in order: exact key, `/<candidate>` suffix,
//! and finally a fuzzy substring match.

use regex::Regex;
use std::collections::HashMap;

use crate::core::{Origin, UsageEntry};

use super::types::{PricingCatalog, PricingRecord};

/// Ordered (pattern, replacement) rules collapsing version spellings.
const VERSION_RULES: &[(&str, &str)] = &[
    (r"(?i)^gpt-(\d+)\.\d+-codex(-mini|-max|-high|-low)?$", "gpt-${1}-codex${2}"),
    (r"(?i)^gpt-(\d+)\.\d+$", "gpt-${1}"),
    (r"(?i)-latest$", ""),
];

/// Hand-maintained overrides for names the catalog does not carry.
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("gpt-5-codex", "gpt-5"),
    ("gpt-5-codex-high", "gpt-5"),
    ("gpt-5-codex-low", "gpt-5"),
    ("gpt-5-codex-max", "gpt-5"),
    ("gpt-5-codex-mini", "gpt-5-mini"),
    ("gemini-3-pro-high", "gemini-3-pro-preview"),
    ("gemini-3-pro-low", "gemini-3-pro-preview"),
];

/// Strategy that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchTier {
    Exact,
    Suffix,
    Fuzzy,
}

impl MatchTier {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Suffix => "suffix",
            MatchTier::Fuzzy => "fuzzy",
        }
    }
}

/// Catalog entry chosen for a model name
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Resolved<'a> {
    pub(crate) key: &'a str,
    pub(crate) record: &'a PricingRecord,
    pub(crate) tier: MatchTier,
}

struct VersionRule {
    pattern: Regex,
    replacement: String,
}

pub(crate) struct ModelResolver {
    rules: Vec<VersionRule>,
    aliases: HashMap<String, String>,
}

impl Default for ModelResolver {
    fn default() -> Self {
        Self::new(VERSION_RULES, MODEL_ALIASES)
    }
}

impl ModelResolver {
    /// Build a resolver from version rules and an alias table.
    ///
    /// Rules must be valid regular expressions.
    pub(crate) fn new(rules: &[(&str, &str)], aliases: &[(&str, &str)]) -> Self {
        let rules = rules
            .iter()
            .map(|(pattern, replacement)| VersionRule {
                pattern: Regex::new(pattern).expect("version rule must be a valid regex"),
                replacement: (*replacement).to_string(),
            })
            .collect();
        let aliases = aliases
            .iter()
            .map(|(from, to)| (from.to_lowercase(), (*to).to_string()))
            .collect();
        Self { rules, aliases }
    }

    /// The trimmed model name followed by its version and alias spellings.
    pub(crate) fn variants(&self, model: &str) -> Vec<String> {
        let trimmed = model.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let mut variants = vec![trimmed.to_string()];
        for rule in &self.rules {
            let derived: Vec<String> = variants
                .iter()
                .filter(|v| rule.pattern.is_match(v))
                .map(|v| rule.pattern.replace(v, rule.replacement.as_str()).into_owned())
                .collect();
            for variant in derived {
                push_unique(&mut variants, variant);
            }
        }

        let aliased: Vec<String> = variants
            .iter()
            .filter_map(|v| self.aliases.get(&v.to_lowercase()).cloned())
            .collect();
        for alias in aliased {
            push_unique(&mut variants, alias);
        }
        variants
    }

    /// Catalog keys worth trying, most specific first.
    ///
    /// Each variant is followed by its provider-qualified forms: the entry's own
    /// provider first, then the providers implied by the origin.
    pub(crate) fn candidates(&self, model: &str, provider: Option<&str>, origin: Origin) -> Vec<String> {
        let providers: Vec<&str> = provider
            .into_iter()
            .chain(origin.implicit_providers().iter().copied())
            .map(|p| p.trim().trim_end_matches('/'))
            .filter(|p| !p.is_empty())
            .collect();

        let mut candidates = Vec::new();
        for variant in self.variants(model) {
            push_unique(&mut candidates, variant.clone());
            for provider in &providers {
                if !variant.starts_with(&format!("{provider}/")) {
                    push_unique(&mut candidates, format!("{provider}/{variant}"));
                }
            }
        }
        candidates
    }

    pub(crate) fn resolve<'a>(&self, catalog: &'a PricingCatalog, entry: &UsageEntry) -> Option<Resolved<'a>> {
        self.resolve_model(catalog, &entry.model, entry.provider.as_deref(), entry.origin)
    }

    pub(crate) fn resolve_model<'a>(
        &self,
        catalog: &'a PricingCatalog,
        model: &str,
        provider: Option<&str>,
        origin: Origin,
    ) -> Option<Resolved<'a>> {
        if catalog.is_empty() || model.trim().is_empty() {
            return None;
        }
        let candidates = self.candidates(model, provider, origin);
        match_exact(catalog, &candidates)
            .or_else(|| match_suffix(catalog, &candidates))
            .or_else(|| match_fuzzy(catalog, model))
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}

/// Tier 1: first candidate that is a catalog key.
fn match_exact<'a>(catalog: &'a PricingCatalog, candidates: &[String]) -> Option<Resolved<'a>> {
    candidates.iter().find_map(|candidate| {
        let (key, record) = catalog.get_key_value(candidate)?;
        Some(Resolved {
            key,
            record,
            tier: MatchTier::Exact,
        })
    })
}

/// Tier 2: first catalog key ending in `/<candidate>`.
fn match_suffix<'a>(catalog: &'a PricingCatalog, candidates: &[String]) -> Option<Resolved<'a>> {
    let suffixes: Vec<String> = candidates.iter().map(|c| format!("/{c}")).collect();
    catalog
        .iter()
        .find(|(key, _)| suffixes.iter().any(|suffix| key.ends_with(suffix.as_str())))
        .map(|(key, record)| Resolved {
            key,
            record,
            tier: MatchTier::Suffix,
        })
}

/// Tier 3: case-insensitive substring overlap between key and model.
///
/// A key overlaps when it contains the model, or the model contains the whole
/// key or the key's last path segment. The longest overlap wins; ties keep the
/// first key in catalog order. Unrelated models sharing a short substring can
/// still match.
fn match_fuzzy<'a>(catalog: &'a PricingCatalog, model: &str) -> Option<Resolved<'a>> {
    let needle = model.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<(usize, Resolved<'a>)> = None;
    for (key, record) in catalog.iter() {
        let hay = key.to_lowercase();
        let name = hay.rsplit('/').next().unwrap_or(hay.as_str());
        let overlap = if hay.contains(&needle) || needle.contains(&hay) {
            hay.len()
        } else if !name.is_empty() && needle.contains(name) {
            name.len()
        } else {
            continue;
        };

        let score = overlap.min(needle.len());
        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((
                score,
                Resolved {
                    key,
                    record,
                    tier: MatchTier::Fuzzy,
                },
            ));
        }
    }
    best.map(|(_, resolved)| resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(input: f64) -> PricingRecord {
        PricingRecord {
            input: Some(input),
            ..Default::default()
        }
    }

    fn catalog(keys: &[&str]) -> PricingCatalog {
        keys.iter()
            .enumerate()
            .map(|(i, k)| (*k, rec(i as f64 + 1.0)))
            .collect()
    }

    fn resolve_key(catalog: &PricingCatalog, model: &str, origin: Origin) -> Option<(String, MatchTier)> {
        ModelResolver::default()
            .resolve_model(catalog, model, None, origin)
            .map(|r| (r.key.to_string(), r.tier))
    }

    #[test]
    fn codex_minor_version_collapses() {
        let variants = ModelResolver::default().variants("gpt-5.1-codex-high");
        assert_eq!(variants, vec!["gpt-5.1-codex-high", "gpt-5-codex-high", "gpt-5"]);

        let variants = ModelResolver::default().variants("gpt-5.1-codex");
        assert_eq!(variants, vec!["gpt-5.1-codex", "gpt-5-codex", "gpt-5"]);

        let variants = ModelResolver::default().variants("gpt-5.1-codex-mini");
        assert_eq!(variants, vec!["gpt-5.1-codex-mini", "gpt-5-codex-mini", "gpt-5-mini"]);
    }

    #[test]
    fn bare_minor_version_collapses() {
        let variants = ModelResolver::default().variants("gpt-5.2");
        assert_eq!(variants, vec!["gpt-5.2", "gpt-5"]);
    }

    #[test]
    fn latest_suffix_is_stripped() {
        let variants = ModelResolver::default().variants("  claude-3.5-sonnet-latest ");
        assert_eq!(variants, vec!["claude-3.5-sonnet-latest", "claude-3.5-sonnet"]);
    }

    #[test]
    fn alias_table_applies_to_raw_name() {
        let variants = ModelResolver::default().variants("gemini-3-pro-high");
        assert_eq!(variants, vec!["gemini-3-pro-high", "gemini-3-pro-preview"]);
    }

    #[test]
    fn blank_model_has_no_variants() {
        assert!(ModelResolver::default().variants("   ").is_empty());
    }

    #[test]
    fn custom_alias_table() {
        let resolver = ModelResolver::new(VERSION_RULES, &[("house-model", "gpt-4o")]);
        assert_eq!(resolver.variants("house-model"), vec!["house-model", "gpt-4o"]);
        assert_eq!(resolver.variants("gpt-5-codex"), vec!["gpt-5-codex"]);
    }

    #[test]
    fn candidates_put_entry_provider_before_origin_providers() {
        let candidates = ModelResolver::default().candidates("gpt-4", Some("custom/"), Origin::Codex);
        assert_eq!(
            candidates,
            vec![
                "gpt-4",
                "custom/gpt-4",
                "openai/gpt-4",
                "azure/gpt-4",
                "openrouter/openai/gpt-4",
            ]
        );
    }

    #[test]
    fn candidates_skip_blank_provider_and_existing_prefix() {
        let candidates =
            ModelResolver::default().candidates("anthropic/claude-opus-4", Some("  "), Origin::Claude);
        assert_eq!(
            candidates,
            vec!["anthropic/claude-opus-4", "vertex_ai/anthropic/claude-opus-4"]
        );
    }

    #[test]
    fn exact_match_prefers_earlier_candidates() {
        let catalog = catalog(&["gpt-5", "openai/gpt-5.1-codex"]);
        assert_eq!(
            resolve_key(&catalog, "gpt-5.1-codex", Origin::Codex),
            Some(("openai/gpt-5.1-codex".to_string(), MatchTier::Exact))
        );
    }

    #[test]
    fn exact_match_through_alias() {
        let catalog = catalog(&["openai/gpt-5", "openai/gpt-5-mini"]);
        assert_eq!(
            resolve_key(&catalog, "gpt-5.1-codex-high", Origin::Codex),
            Some(("openai/gpt-5".to_string(), MatchTier::Exact))
        );
    }

    #[test]
    fn exact_match_with_origin_provider() {
        let catalog = catalog(&["anthropic/claude-sonnet-4-5", "vertex_ai/claude-sonnet-4-5"]);
        assert_eq!(
            resolve_key(&catalog, "claude-sonnet-4-5", Origin::Claude),
            Some(("anthropic/claude-sonnet-4-5".to_string(), MatchTier::Exact))
        );
    }

    #[test]
    fn suffix_match_for_unlisted_provider() {
        let catalog = catalog(&["bedrock/us.anthropic/claude-haiku-4-5", "deepinfra/claude-haiku-4-5"]);
        assert_eq!(
            resolve_key(&catalog, "claude-haiku-4-5", Origin::Claude),
            Some(("bedrock/us.anthropic/claude-haiku-4-5".to_string(), MatchTier::Suffix))
        );
    }

    #[test]
    fn suffix_tie_takes_first_key_in_sorted_order() {
        let catalog = catalog(&["vertex_ai-beta/claude-x-1", "azure_ai/claude-x-1", "bedrock/claude-x-1"]);
        assert_eq!(
            resolve_key(&catalog, "claude-x-1", Origin::Claude),
            Some(("azure_ai/claude-x-1".to_string(), MatchTier::Suffix))
        );
    }

    #[test]
    fn fuzzy_prefers_longer_overlap() {
        let catalog = catalog(&["openai/gpt-4", "openai/gpt-4-turbo"]);
        assert_eq!(
            resolve_key(&catalog, "gpt-4-turbo-preview", Origin::Codex),
            Some(("openai/gpt-4-turbo".to_string(), MatchTier::Fuzzy))
        );
    }

    #[test]
    fn fuzzy_matches_key_containing_model() {
        let catalog = catalog(&["anthropic/claude-opus-4-20250514"]);
        assert_eq!(
            resolve_key(&catalog, "Claude-Opus-4", Origin::Claude),
            Some(("anthropic/claude-opus-4-20250514".to_string(), MatchTier::Fuzzy))
        );
    }

    #[test]
    fn fuzzy_tie_keeps_first_key() {
        let catalog = catalog(&["a/gpt-4", "b/gpt-4"]);
        let resolved = ModelResolver::default()
            .resolve_model(&catalog, "gpt-4-0613", None, Origin::Gemini)
            .unwrap();
        assert_eq!(resolved.key, "a/gpt-4");
        assert_eq!(resolved.record.input, Some(1.0));
    }

    #[test]
    fn unknown_model_is_not_found() {
        let catalog = catalog(&["openai/gpt-4"]);
        assert_eq!(resolve_key(&catalog, "llama-3-70b", Origin::Codex), None);
        assert_eq!(resolve_key(&catalog, "  ", Origin::Codex), None);
        assert_eq!(resolve_key(&PricingCatalog::default(), "gpt-4", Origin::Codex), None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let catalog = catalog(&["openai/gpt-4", "openai/gpt-4-turbo", "azure/gpt-4-turbo", "gpt-4o"]);
        let resolver = ModelResolver::default();
        let first = resolver.resolve_model(&catalog, "gpt-4-turbo-2024", None, Origin::Codex);
        for _ in 0..10 {
            assert_eq!(
                resolver.resolve_model(&catalog, "gpt-4-turbo-2024", None, Origin::Codex),
                first
            );
        }
    }

    #[test]
    fn resolve_uses_entry_fields() {
        let catalog = catalog(&["openrouter/qwen/qwen3-coder"]);
        let mut entry = UsageEntry::new(
            Origin::Codex,
            "2026-02-06T10:00:00Z".parse().unwrap(),
            "qwen3-coder",
        );
        entry.provider = Some("openrouter/qwen".to_string());
        let resolved = ModelResolver::default().resolve(&catalog, &entry).unwrap();
        assert_eq!(resolved.key, "openrouter/qwen/qwen3-coder");
        assert_eq!(resolved.tier, MatchTier::Exact);
    }

    #[test]
    fn tier_names() {
        assert_eq!(MatchTier::Exact.as_str(), "exact");
        assert_eq!(MatchTier::Suffix.as_str(), "suffix");
        assert_eq!(MatchTier::Fuzzy.as_str(), "fuzzy");
    }
}
