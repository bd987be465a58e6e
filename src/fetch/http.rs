//! HTTP download of routing tables and ready-made prefix lists.

use crate::error::FetchError;
use colored::Colorize;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;

/// Per-request timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client shared by every download of a run.
pub fn build_client(user_agent: &str) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(user_agent)
        .build()
        .map_err(|e| FetchError::unavailable("<client>", format!("Client error: {e}")))
}

/// Download `url` as text. Any non-2xx status is an error.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, FetchError> {
    log::debug!("GET {}", url.on_blue());

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::unavailable(url, format!("Request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("{} GET {url}: HTTP {status}", "failed".on_red());
        return Err(FetchError::unavailable(url, format!("HTTP {status}")));
    }

    let text = response
        .text()
        .await
        .map_err(|e| FetchError::unavailable(url, format!("Read error: {e}")))?;

    log::debug!("GET {url}: {} bytes", text.len());
    Ok(text)
}

/// Download several URLs concurrently and keep the texts that arrived.
///
/// Failed URLs are logged and dropped. Only when every URL fails is the
/// first error returned.
pub async fn fetch_all(client: &Client, urls: &[String]) -> Result<Vec<String>, FetchError> {
    let results = join_all(urls.iter().map(|url| fetch_text(client, url))).await;

    let mut texts = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(text) => texts.push(text),
            Err(e) => {
                log::warn!("{e}");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if texts.is_empty() => Err(e),
        _ => Ok(texts),
    }
}
