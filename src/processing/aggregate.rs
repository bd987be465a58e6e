//! CIDR aggregation (supernet collapsing).
//!
//! Collapses a set of same-version prefixes into the minimal sorted set of
//! disjoint blocks covering the same addresses. Blocks nested in an earlier
//! block are dropped and sibling halves are merged into their parent, cascading
//! upward for as long as the tiling holds.

use crate::models::{GroupResult, Prefix};
use crate::processing::classify_by_version;
use itertools::Itertools;

/// Collapse `prefixes` into the minimal sorted set of disjoint CIDR blocks.
///
/// All prefixes must be of the same IP version; use [`aggregate_mixed`] otherwise.
///
/// # Examples
/// ```
/// use route_subnets::models::Prefix;
/// use route_subnets::processing::aggregate;
/// let input: Vec<Prefix> = ["10.0.0.0/24", "10.0.1.0/24"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let output: Vec<String> = aggregate(&input).iter().map(|p| p.to_string()).collect();
/// assert_eq!(output, vec!["10.0.0.0/23"]);
/// ```
pub fn aggregate(prefixes: &[Prefix]) -> Vec<Prefix> {
    debug_assert!(
        prefixes.iter().map(|p| p.version()).all_equal(),
        "aggregate() called with mixed IP versions"
    );

    // Sorted by (address, length), so a containing block always comes first
    // and only the top of the stack can contain the next candidate.
    let mut stack: Vec<Prefix> = Vec::with_capacity(prefixes.len());
    for prefix in prefixes.iter().copied().sorted().dedup() {
        if let Some(top) = stack.last() {
            if top.contains(&prefix) {
                continue;
            }
        }
        stack.push(prefix);
        merge_siblings(&mut stack);
    }

    log::trace!("aggregate: {} -> {} prefixes", prefixes.len(), stack.len());
    stack
}

/// Replace the two top entries by their parent while they are siblings.
fn merge_siblings(stack: &mut Vec<Prefix>) {
    while let [.., lower, upper] = stack.as_slice() {
        if !lower.is_sibling(upper) {
            break;
        }
        let Some(parent) = lower.supernet() else {
            break;
        };
        stack.truncate(stack.len() - 2);
        stack.push(parent);
    }
}

/// Split a mixed list by IP version and aggregate each half.
pub fn aggregate_mixed(prefixes: &[Prefix]) -> GroupResult {
    let (ipv4, ipv6) = classify_by_version(prefixes.iter().copied());
    GroupResult {
        ipv4: aggregate(&ipv4),
        ipv6: aggregate(&ipv6),
    }
}
