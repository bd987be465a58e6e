//! Prefix classification by origin AS and IP version.

use crate::models::{Prefix, RouteRecord};
use itertools::{Either, Itertools};

/// Strip an optional `AS` prefix from a configured AS number ("AS15169" -> "15169").
pub fn normalize_asn(asn: &str) -> &str {
    let asn = asn.trim();
    asn.strip_prefix("AS")
        .or_else(|| asn.strip_prefix("as"))
        .unwrap_or(asn)
}

/// Split prefixes into (IPv4, IPv6), keeping input order.
pub fn classify_by_version<I>(prefixes: I) -> (Vec<Prefix>, Vec<Prefix>)
where
    I: IntoIterator<Item = Prefix>,
{
    prefixes.into_iter().partition_map(|prefix| {
        if prefix.is_ipv4() {
            Either::Left(prefix)
        } else {
            Either::Right(prefix)
        }
    })
}

/// Select the prefixes originated by `target_as` and split them into (IPv4, IPv6).
///
/// AS tokens are opaque and compared verbatim; no ranges or aliases. Configured
/// AS numbers go through [`normalize_asn`] when the configuration is loaded.
pub fn classify_by_as(records: &[RouteRecord], target_as: &str) -> (Vec<Prefix>, Vec<Prefix>) {
    classify_by_version(
        records
            .iter()
            .filter(|r| r.origin_as == target_as)
            .map(|r| r.prefix),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prefix: &str, asn: &str) -> RouteRecord {
        RouteRecord::new(prefix.parse().unwrap(), asn)
    }

    #[test]
    fn test_classify_by_as() {
        let records = vec![record("8.8.8.0/24", "15169"), record("1.1.1.0/24", "13335")];
        let (v4, v6) = classify_by_as(&records, "15169");
        assert_eq!(v4, vec!["8.8.8.0/24".parse::<Prefix>().unwrap()]);
        assert!(v6.is_empty());
    }

    #[test]
    fn test_classify_by_as_keeps_order_and_splits_versions() {
        let records = vec![
            record("31.13.64.0/18", "32934"),
            record("2a03:2880::/29", "32934"),
            record("8.8.8.0/24", "15169"),
            record("157.240.0.0/17", "32934"),
        ];
        let (v4, v6) = classify_by_as(&records, "32934");
        let v4: Vec<String> = v4.iter().map(|p| p.to_string()).collect();
        assert_eq!(v4, vec!["31.13.64.0/18", "157.240.0.0/17"]);
        assert_eq!(v6.len(), 1);
    }

    #[test]
    fn test_classify_by_as_exact_match_only() {
        let records = vec![record("8.8.8.0/24", "151690"), record("8.8.4.0/24", "1516")];
        let (v4, v6) = classify_by_as(&records, "15169");
        assert!(v4.is_empty() && v6.is_empty());
    }

    #[test]
    fn test_classify_by_as_identical_tokens_match() {
        let records = vec![record("8.8.8.0/24", "AS15169"), record("8.8.4.0/24", "15169")];

        let (v4, _) = classify_by_as(&records, "AS15169");
        assert_eq!(v4, vec!["8.8.8.0/24".parse::<Prefix>().unwrap()]);

        let (v4, _) = classify_by_as(&records, "15169");
        assert_eq!(v4, vec!["8.8.4.0/24".parse::<Prefix>().unwrap()]);
    }

    #[test]
    fn test_normalize_asn() {
        assert_eq!(normalize_asn("AS13335"), "13335");
        assert_eq!(normalize_asn("as13335"), "13335");
        assert_eq!(normalize_asn(" 13335 "), "13335");
    }
}
