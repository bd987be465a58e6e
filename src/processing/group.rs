//! Per-group pipeline steps: select, classify, aggregate.
//!
//! Pure functions; fetching and writing live in [`crate::pipeline`].

use crate::models::{GroupResult, RouteRecord};
use crate::processing::{aggregate, aggregate_mixed, classify_by_as, parse_prefix_list_lossy};

/// Aggregate every prefix originated by `target_as` in the shared table.
pub fn aggregate_as_group(records: &[RouteRecord], target_as: &str) -> GroupResult {
    let (ipv4, ipv6) = classify_by_as(records, target_as);
    log::debug!(
        "AS{target_as}: matched {} IPv4 + {} IPv6 prefixes",
        ipv4.len(),
        ipv6.len()
    );
    GroupResult {
        ipv4: aggregate(&ipv4),
        ipv6: aggregate(&ipv6),
    }
}

/// Aggregate the prefixes of one or more ready-made list texts.
///
/// Bad lines are always skipped; one broken entry in a published list must not
/// drop the whole service.
pub fn aggregate_source_texts<S: AsRef<str>>(texts: &[S]) -> GroupResult {
    let prefixes: Vec<_> = texts
        .iter()
        .flat_map(|text| parse_prefix_list_lossy(text.as_ref()))
        .collect();
    aggregate_mixed(&prefixes)
}
