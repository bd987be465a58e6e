//! Routing-table record data model.

use super::Prefix;
use std::fmt;

/// One line of the global routing table: a prefix and the AS that originates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Announced prefix, already canonical.
    pub prefix: Prefix,
    /// Origin AS token exactly as it appeared in the table (e.g. "15169").
    pub origin_as: String,
}

impl RouteRecord {
    pub fn new(prefix: Prefix, origin_as: impl Into<String>) -> RouteRecord {
        RouteRecord {
            prefix,
            origin_as: origin_as.into(),
        }
    }
}

impl fmt::Display for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS{}", self.prefix, self.origin_as)
    }
}
