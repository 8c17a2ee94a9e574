use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::contract::{FetchError, FetchOutcome, Fetcher};

/// Extension of the remote translation documents.
pub const REMOTE_EXTENSION: &str = "yml";

/// Builds `{base_url}/{key}.yml`, tolerating a trailing slash on the base.
pub fn resource_url(base_url: &str, key: &str) -> String {
    let base_url = base_url.trim_end_matches('/'); // avoid "//"
    format!("{base_url}/{key}.{REMOTE_EXTENSION}")
}

/// Keys go verbatim into a URL path and a file name, so only allow `[A-Za-z0-9_-]+`.
pub fn is_url_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Fetches `{base_url}/{key}.yml` over HTTP with one shared reqwest client.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            error!(error = ?e, "Failed to build http client");
            FetchError::Client(e.to_string())
        })?;
        let base_url = base_url.into();
        info!(base_url = %base_url, ?timeout, "Constructed http fetcher");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, key: &str) -> Result<FetchOutcome, FetchError> {
        let url = resource_url(&self.base_url, key);
        debug!(url = %url, key = key, "Fetching translation document");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, key = key, "Failed to fetch translation document");
            FetchError::Request {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %url, key = key, "Remote returned non-success status");
            return Ok(FetchOutcome::Missing {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| {
            error!(error = ?e, url = %url, key = key, "Failed to read response body");
            FetchError::Body {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;
        debug!(url = %url, key = key, bytes = text.len(), "Fetched translation document");
        Ok(FetchOutcome::Found(text))
    }
}
