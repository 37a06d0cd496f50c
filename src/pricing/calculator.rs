use crate::core::UsageEntry;

use super::types::PricingRecord;

/// Token count above which the `_above_200k_tokens` rates apply.
pub(crate) const TIER_THRESHOLD: u64 = 200_000;

fn valid_rate(rate: Option<f64>) -> f64 {
    match rate {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => 0.0,
    }
}

/// Cost of `tokens` at `base`, switching to `high` for the part above `threshold`.
pub(crate) fn tiered_cost(tokens: u64, base: Option<f64>, high: Option<f64>, threshold: u64) -> f64 {
    if tokens == 0 {
        return 0.0;
    }
    let base = valid_rate(base);
    let high = valid_rate(high);

    if tokens > threshold && high > 0.0 {
        let below = threshold as f64 * base;
        let above = (tokens - threshold) as f64 * high;
        below + above
    } else {
        tokens as f64 * base
    }
}

/// Token buckets billed for one entry, after origin-specific accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BillableTokens {
    pub(crate) input: u64,
    pub(crate) output: u64,
    pub(crate) cache_write: u64,
    pub(crate) cache_read: u64,
}

impl BillableTokens {
    pub(crate) fn from_entry(entry: &UsageEntry) -> Self {
        let mut input = entry.input_tokens;
        let mut cache_read = entry.cache_read_tokens;
        let mut output = entry.output_tokens;

        if entry.origin.cache_read_included_in_input() {
            cache_read = cache_read.min(input);
            input -= cache_read;
        }
        if entry.origin.reasoning_billed_as_output() {
            output = output.saturating_add(entry.reasoning_tokens);
        }

        Self {
            input,
            output,
            cache_write: entry.cache_write_tokens,
            cache_read,
        }
    }
}

/// Sum of the four tiered bucket costs.
pub(crate) fn billable_cost(record: &PricingRecord, tokens: &BillableTokens) -> f64 {
    tiered_cost(
        tokens.input,
        record.input,
        record.input_above_threshold,
        TIER_THRESHOLD,
    ) + tiered_cost(
        tokens.output,
        record.output,
        record.output_above_threshold,
        TIER_THRESHOLD,
    ) + tiered_cost(
        tokens.cache_write,
        record.cache_write,
        record.cache_write_above_threshold,
        TIER_THRESHOLD,
    ) + tiered_cost(
        tokens.cache_read,
        record.cache_read,
        record.cache_read_above_threshold,
        TIER_THRESHOLD,
    )
}

pub(crate) fn entry_cost(record: &PricingRecord, entry: &UsageEntry) -> f64 {
    billable_cost(record, &BillableTokens::from_entry(entry))
}
