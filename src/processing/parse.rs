//! Prefix and routing-table parsing.
//!
//! Turns single tokens, ready-made prefix lists and routing-table text into
//! canonical [`Prefix`] values. What happens to a bad line is decided by the
//! caller through [`ParsePolicy`].

use crate::error::PrefixError;
use crate::models::{Prefix, RouteRecord};
use crate::processing::classify_by_version;
use serde::Deserialize;
use std::net::IpAddr;

/// What to do with a line that does not hold a valid prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Log a warning and continue with the next line.
    #[default]
    Skip,
    /// Stop at the first bad line and return its error.
    Abort,
}

/// Parse one token as an IP network.
///
/// Accepts `addr/len` and bare addresses (host routes, /32 or /128).
/// Host bits in the address are cleared.
///
/// # Examples
/// ```
/// use route_subnets::processing::parse_prefix;
/// assert_eq!(parse_prefix("10.1.2.3/24").unwrap().to_string(), "10.1.2.0/24");
/// assert!(parse_prefix("10.0.0.0/33").is_err());
/// ```
pub fn parse_prefix(token: &str) -> Result<Prefix, PrefixError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(PrefixError::invalid(token, "empty token"));
    }

    let (addr_part, len_part) = match token.split_once('/') {
        Some((addr, len)) => (addr, Some(len)),
        None => (token, None),
    };

    let addr: IpAddr = addr_part
        .parse()
        .map_err(|_| PrefixError::invalid(token, format!("invalid address {addr_part}")))?;

    let len_part = match len_part {
        Some(len) => len,
        None => return Ok(Prefix::host(addr)),
    };
    if len_part.is_empty() || !len_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrefixError::invalid(
            token,
            format!("invalid prefix length {len_part}"),
        ));
    }
    let len: u8 = len_part
        .parse()
        .map_err(|_| PrefixError::invalid(token, format!("invalid prefix length {len_part}")))?;

    Prefix::new(addr, len).map_err(|e| match e {
        PrefixError::InvalidPrefix { reason, .. } => PrefixError::invalid(token, reason),
    })
}

/// Strip comments and whitespace from a list line. `None` for blank and comment lines.
fn strip_comment(line: &str) -> Option<&str> {
    let content = line
        .split(|c| c == '#' || c == ';')
        .next()
        .unwrap_or("")
        .trim();
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

/// Apply `policy` to one parse result. `Ok(None)` means the line was skipped.
fn apply_policy<T>(
    result: Result<T, PrefixError>,
    policy: ParsePolicy,
    skipped: &mut usize,
) -> Result<Option<T>, PrefixError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => match policy {
            ParsePolicy::Skip => {
                log::warn!("Invalid subnet: {}", e.token());
                *skipped += 1;
                Ok(None)
            }
            ParsePolicy::Abort => Err(e),
        },
    }
}

/// Parse a ready-made prefix list, one prefix per line.
///
/// Blank lines and `#`/`;` comments are ignored under either policy.
pub fn parse_prefix_list(text: &str, policy: ParsePolicy) -> Result<Vec<Prefix>, PrefixError> {
    let mut prefixes = Vec::new();
    let mut skipped = 0;

    for token in list_tokens(text) {
        if let Some(prefix) = apply_policy(parse_prefix(token), policy, &mut skipped)? {
            prefixes.push(prefix);
        }
    }

    if skipped > 0 {
        log::info!("Skipped {skipped} invalid line(s), kept {}", prefixes.len());
    }
    Ok(prefixes)
}

/// Parse a ready-made prefix list, logging and dropping every invalid line.
pub fn parse_prefix_list_lossy(text: &str) -> Vec<Prefix> {
    let mut skipped = 0;
    let prefixes: Vec<Prefix> = list_tokens(text)
        .filter_map(|token| match parse_prefix(token) {
            Ok(prefix) => Some(prefix),
            Err(e) => {
                log::warn!("Invalid subnet: {}", e.token());
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        log::info!("Skipped {skipped} invalid line(s), kept {}", prefixes.len());
    }
    prefixes
}

/// First field of every non-blank, non-comment list line.
fn list_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .filter_map(strip_comment)
        .map(|content| content.split_whitespace().next().unwrap_or(content))
}

/// Parse a ready-made list and split it into (IPv4, IPv6), keeping line order.
pub fn split_by_version(
    text: &str,
    policy: ParsePolicy,
) -> Result<(Vec<Prefix>, Vec<Prefix>), PrefixError> {
    let prefixes = parse_prefix_list(text, policy)?;
    Ok(classify_by_version(prefixes))
}

/// Split a routing-table line into its (prefix, origin AS) tokens.
///
/// Lines with fewer than two fields carry no origin AS and yield `None`.
pub fn split_table_line(line: &str) -> Option<(&str, &str)> {
    let content = strip_comment(line)?;
    let mut fields = content.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(prefix), Some(origin_as)) => Some((prefix, origin_as)),
        _ => None,
    }
}

/// Parse the whole routing table into [`RouteRecord`]s.
pub fn parse_table(text: &str, policy: ParsePolicy) -> Result<Vec<RouteRecord>, PrefixError> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (prefix_token, origin_as) in text.lines().filter_map(split_table_line) {
        let parsed = parse_prefix(prefix_token).map(|p| RouteRecord::new(p, origin_as));
        if let Some(record) = apply_policy(parsed, policy, &mut skipped)? {
            records.push(record);
        }
    }

    log::info!(
        "Parsed routing table: {} records, {} skipped",
        records.len(),
        skipped
    );
    Ok(records)
}
