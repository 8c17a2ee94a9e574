//! # contract: shared types and the fetch seam
//!
//! This module defines the [`Fetcher`] trait that the pipeline uses to reach the
//! remote translation host, plus the plain data types passed between the
//! pipeline stages.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can script per-key responses
//!   without a network (`MockFetcher`, exported with the `test-export-mocks` feature).
//!
//! ## Adding New Fetchers
//! - Implement [`Fetcher`] for your transport.
//! - Report a non-success status as [`FetchOutcome::Missing`], not as an error.
//!   Errors are for requests that could not be completed at all.

use async_trait::async_trait;
use std::path::PathBuf;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Short code identifying a language, e.g. `en` or `pt_BR`.
pub type LanguageKey = String;

/// What the remote host answered for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Success status; the full response body.
    Found(String),
    /// Any non-success status. Means "no translation yet".
    Missing { status: u16 },
}

/// A request that did not produce a usable response.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Fetches the remote translation document for a key.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Request the document for `key` and report what came back.
    async fn fetch(&self, key: &str) -> Result<FetchOutcome, FetchError>;
}

/// How a single key ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Fetched, converted and written to `path`.
    Saved { path: PathBuf },
    /// Remote answered with a non-success status.
    Skipped { status: u16 },
    /// Anything else went wrong; nothing was recorded for the key.
    Failed { reason: String },
}

/// Result of processing one key, as returned by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub key: LanguageKey,
    pub outcome: KeyOutcome,
}

impl KeyReport {
    pub fn is_saved(&self) -> bool {
        matches!(self.outcome, KeyOutcome::Saved { .. })
    }
}
