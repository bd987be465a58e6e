//! Daily cache of the routing table.
//!
//! The full table is large and its publisher rate-limits downloads, so one copy
//! per day is kept on disk and reused by later runs.

use super::http::fetch_text;
use crate::error::FetchError;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Cache file name for today, e.g. `bgp_table_2026-10-18.txt`.
pub fn table_cache_file(cache_dir: &Path) -> PathBuf {
    let now = chrono::Local::now();
    cache_dir.join(format!("bgp_table_{}.txt", now.format("%Y-%m-%d")))
}

/// Read today's cached table, if any.
pub fn read_table_cache(cache_file: &Path) -> Option<String> {
    match std::fs::read_to_string(cache_file) {
        Ok(text) => {
            log::info!("Reading routing table from cache file: {}", cache_file.display());
            Some(text)
        }
        Err(_) => {
            log::warn!("Cache file not found: {}", cache_file.display());
            None
        }
    }
}

/// Store `text` as the cached table.
pub fn write_table_cache(cache_file: &Path, text: &str) -> Result<(), FetchError> {
    let to_cache_error = |source| FetchError::Cache {
        path: cache_file.to_path_buf(),
        source,
    };
    if let Some(dir) = cache_file.parent() {
        std::fs::create_dir_all(dir).map_err(to_cache_error)?;
    }
    log::warn!("Writing routing table to cache file: {}", cache_file.display());
    std::fs::write(cache_file, text).map_err(to_cache_error)
}

/// Return the routing table text, from today's cache when possible.
///
/// # Arguments
/// * `client` - HTTP client used on a cache miss
/// * `url` - Routing table URL
/// * `cache_dir` - Cache directory, `None` disables the cache
pub async fn read_table(
    client: &Client,
    url: &str,
    cache_dir: Option<&Path>,
) -> Result<String, FetchError> {
    let cache_file = cache_dir.map(table_cache_file);

    if let Some(text) = cache_file.as_deref().and_then(read_table_cache) {
        return Ok(text);
    }

    let text = fetch_text(client, url).await?;
    if text.trim().is_empty() {
        return Err(FetchError::unavailable(url, "empty routing table"));
    }

    if let Some(cache_file) = &cache_file {
        // A failed cache write costs a download next time, nothing more
        if let Err(e) = write_table_cache(cache_file, &text) {
            log::warn!("{e}");
        }
    }
    Ok(text)
}
