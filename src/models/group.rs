//! Output group data model.

use super::Prefix;
use std::fmt;

/// How a group picks its prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every routing-table record whose origin AS equals this token.
    Asn(String),
    /// Every prefix listed in the ready-made lists at these URLs.
    Source(Vec<String>),
}

/// Rendered output names of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNames {
    /// Prefix-list file name, e.g. "meta.lst".
    pub file: String,
    /// RouterOS address-list name, also used for the script file name.
    pub list_name: String,
    /// Comment attached to every address-list entry.
    pub comment: String,
}

/// A configured AS or service whose prefixes are aggregated and written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Configuration key (AS number or service key).
    pub key: String,
    /// Human name the templates are rendered from.
    pub name: String,
    pub selector: Selector,
    pub names: GroupNames,
    /// Also write a copy of the prefix lists under a capitalised file name.
    pub legacy_copy: bool,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Selector::Asn(asn) => write!(f, "{} (AS{})", self.name, asn),
            Selector::Source(urls) => write!(f, "{} ({} source(s))", self.name, urls.len()),
        }
    }
}

/// Aggregated prefixes of one group, split by IP version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupResult {
    pub ipv4: Vec<Prefix>,
    pub ipv6: Vec<Prefix>,
}

impl GroupResult {
    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }
}
