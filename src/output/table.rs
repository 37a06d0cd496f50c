use comfy_table::{Cell, Color};
use std::path::Path;

use crate::core::{LoadResult, Origin};
use crate::pricing::{
    CostSummary, PricingRecord, PricingSource, PricingStatus, Resolved, TIER_THRESHOLD,
};

use super::format::{
    create_styled_table, format_cost, format_number, format_rate, header_cell, right_cell,
    styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct CostTableOptions<'a> {
    pub(crate) source_label: &'a str,
    pub(crate) use_color: bool,
}

/// Print the per-model cost table with a total row and unknown-pricing footer
pub(crate) fn print_cost_table(summary: &CostSummary, loaded: &LoadResult, opts: CostTableOptions<'_>) {
    let c = opts.use_color;
    let cost_color = c.then_some(Color::Green);
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Model", c),
        header_cell("Calls", c),
        header_cell("Input", c),
        header_cell("Output", c),
        header_cell("Reason", c),
        header_cell("Cache W", c),
        header_cell("Cache R", c),
        header_cell("Cost", c),
    ]);

    for (model, stats) in &summary.models {
        // Nothing priced at all: show N/A rather than a misleading $0.00.
        let cost = if stats.unknown_entries == stats.tokens.count {
            f64::NAN
        } else {
            stats.cost
        };
        let color = if cost.is_nan() { c.then_some(Color::Yellow) } else { cost_color };
        table.add_row(vec![
            Cell::new(model),
            right_cell(&format_number(stats.tokens.count), None, false),
            right_cell(&format_number(stats.tokens.input_tokens), None, false),
            right_cell(&format_number(stats.tokens.output_tokens), None, false),
            right_cell(&format_number(stats.tokens.reasoning_tokens), None, false),
            right_cell(&format_number(stats.tokens.cache_write), None, false),
            right_cell(&format_number(stats.tokens.cache_read), None, false),
            right_cell(&format_cost(cost), color, false),
        ]);
    }

    let totals = &summary.tokens;
    table.add_row(vec![
        styled_cell("TOTAL", None, true),
        right_cell(&format_number(totals.count), None, true),
        right_cell(&format_number(totals.input_tokens), None, true),
        right_cell(&format_number(totals.output_tokens), None, true),
        right_cell(&format_number(totals.reasoning_tokens), None, true),
        right_cell(&format_number(totals.cache_write), None, true),
        right_cell(&format_number(totals.cache_read), None, true),
        right_cell(&format_cost(summary.total_cost), cost_color, true),
    ]);

    println!("\n  {} Cost Estimate\n", opts.source_label);
    println!("{table}");

    if summary.unknown_entries > 0 {
        let models: Vec<&str> = summary.unknown_models.iter().map(String::as_str).collect();
        println!(
            "\n  {} entries without pricing (excluded from cost): {}",
            format_number(summary.unknown_entries),
            models.join(", ")
        );
    }
    println!(
        "\n  {} entries from {} files | {:.0}ms\n",
        format_number(totals.count),
        format_number(loaded.files as u64),
        loaded.elapsed_ms
    );
}

pub(crate) fn print_pricing_table(status: &PricingStatus, cache_path: &Path, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Pricing", use_color), header_cell("", use_color)]);
    let source_color = if status.is_empty {
        use_color.then_some(Color::Yellow)
    } else {
        use_color.then_some(Color::Green)
    };
    table.add_row(vec![Cell::new("Source"), styled_cell(status.source.as_str(), source_color, false)]);
    table.add_row(vec![
        Cell::new("Models"),
        right_cell(&format_number(status.catalog.len() as u64), None, false),
    ]);
    table.add_row(vec![Cell::new("Cache"), Cell::new(cache_path.display())]);
    println!("{table}");
}

fn rate_rows(record: &PricingRecord) -> [(&'static str, Option<f64>, Option<f64>); 4] {
    [
        ("Input", record.input, record.input_above_threshold),
        ("Output", record.output, record.output_above_threshold),
        ("Cache write", record.cache_write, record.cache_write_above_threshold),
        ("Cache read", record.cache_read, record.cache_read_above_threshold),
    ]
}

pub(crate) fn print_lookup_table(model: &str, origin: Origin, resolved: &Resolved<'_>, use_color: bool) {
    println!(
        "\n  {model} ({origin}) -> {} [{} match]\n",
        resolved.key,
        resolved.tier.as_str()
    );

    let mut table = create_styled_table();
    let above = format!("> {} tokens", format_number(TIER_THRESHOLD));
    table.set_header(vec![
        header_cell("Rate per 1M", use_color),
        header_cell("Base", use_color),
        header_cell(&above, use_color),
    ]);
    for (label, base, high) in rate_rows(resolved.record) {
        table.add_row(vec![
            Cell::new(label),
            right_cell(&format_rate(base), None, false),
            right_cell(&format_rate(high), None, false),
        ]);
    }
    println!("{table}\n");
}

/// One-line stderr summary of how pricing was acquired
pub(crate) fn pricing_status_line(status: &PricingStatus, elapsed_ms: f64) -> String {
    let models = format_number(status.catalog.len() as u64);
    match status.source {
        PricingSource::Remote => format!("Fetched pricing for {models} models ({elapsed_ms:.0}ms)"),
        PricingSource::FreshCache => format!("Pricing fetch failed, using cached pricing ({models} models)"),
        PricingSource::StaleCache => {
            format!("Pricing fetch failed, using stale cached pricing ({models} models)")
        }
        PricingSource::OfflineCache => format!("Using cached pricing ({models} models)"),
        PricingSource::OfflineEmpty => {
            "No cached pricing available offline, costs will be unknown".to_string()
        }
        PricingSource::Unavailable => "Pricing unavailable, costs will be unknown".to_string(),
    }
}
