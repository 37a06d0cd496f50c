//! Core module - shared types and logic for all data sources

mod tokens;
mod types;

pub(crate) use tokens::{coerce_rate, lenient_rate, lenient_tokens};
pub(crate) use types::{LoadResult, Origin, TokenTotals, UsageEntry};
