//! Prefix processing core.
//!
//! Pure, synchronous building blocks, safe to call from any thread:
//! - [`parse`] - Prefix, prefix-list and routing-table parsing
//! - [`classify`] - Selection by origin AS and IP version
//! - [`aggregate`] - CIDR collapsing
//! - [`group`] - Per-group select + aggregate steps

mod aggregate;
mod classify;
mod group;
mod parse;

// Re-export public functions
pub use aggregate::{aggregate, aggregate_mixed};
pub use classify::{classify_by_as, classify_by_version, normalize_asn};
pub use group::{aggregate_as_group, aggregate_source_texts};
pub use parse::{
    parse_prefix, parse_prefix_list, parse_prefix_list_lossy, parse_table, split_by_version,
    split_table_line, ParsePolicy,
};
