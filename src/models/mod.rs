//! Domain models for route-subnets.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Prefix`] - IPv4/IPv6 CIDR block in canonical form
//! - [`RouteRecord`] - Routing-table entry (prefix + origin AS)
//! - [`Group`] and [`GroupResult`] - Configured output groups and their aggregated prefixes

mod group;
mod prefix;
mod route;

// Re-export public types
pub use group::{Group, GroupNames, GroupResult, Selector};
pub use prefix::{addr_bits, get_cidr_mask, IpVersion, Prefix, MAX_LENGTH_V4, MAX_LENGTH_V6};
pub use route::RouteRecord;
