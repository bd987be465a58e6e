//! Remote text sources.
//!
//! This module handles everything that touches the network:
//! - [`http`] - Downloads with a shared client
//! - [`cache`] - Daily routing-table cache

mod cache;
mod http;

// Re-export public types and functions
pub use cache::{read_table, read_table_cache, table_cache_file, write_table_cache};
pub use http::{build_client, fetch_all, fetch_text, REQUEST_TIMEOUT_SECS};
