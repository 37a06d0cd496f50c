mod format;
mod json;
mod table;

pub(crate) use json::{output_cost_json, output_lookup_json, output_pricing_json};
pub(crate) use table::{
    CostTableOptions, pricing_status_line, print_cost_table, print_lookup_table, print_pricing_table,
};
