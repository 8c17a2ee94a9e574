//! High-level pipeline: orchestrates key loading → fetch/convert per key → manifest generation.
//!
//! This module provides the top-level orchestration for one translation sync run:
//!   - Loads the candidate language keys from the configured key source
//!   - Fetches, converts and saves every key concurrently, one worker per key
//!   - Waits for every worker to settle, then writes the manifest of saved keys
//!
//! # Error Handling
//! Only the key source, the translations directory and the manifest write can fail a run
//! ([`SyncError`]). Everything that goes wrong for a single key stays inside that key's
//! worker and shows up as [`KeyOutcome::Skipped`] or [`KeyOutcome::Failed`] in the report.
//!
//! # Navigation
//! - Main entrypoint: [`synchronise`]
//! - Single key: [`process_key`]

use std::io::Write;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{error, info, warn};

use crate::config::SyncConfig;
use crate::contract::{FetchError, FetchOutcome, Fetcher, KeyOutcome, KeyReport, LanguageKey};
use crate::convert::{yaml_to_json, ConvertError};
use crate::download::{is_url_safe_key, REMOTE_EXTENSION};
use crate::keys::{load_keys, KeySourceError};
use crate::manifest::{sorted_keys, write_manifest, ManifestError};

/// Extension of the converted local files.
pub const LOCAL_EXTENSION: &str = "json";

/// Failures that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    KeySource(#[from] KeySourceError),

    #[error("failed to create translations directory {path:?}: {source}")]
    LangsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Saved keys, sorted; exactly the manifest contents.
    pub translated: Vec<LanguageKey>,
    /// Keys the remote had no document for, with the status it answered.
    pub skipped: Vec<(LanguageKey, u16)>,
    /// Keys that failed, with the reason.
    pub failed: Vec<(LanguageKey, String)>,
    pub manifest_path: PathBuf,
}

impl SyncReport {
    /// File name of the manifest, for the summary line.
    pub fn manifest_file_name(&self) -> String {
        self.manifest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.manifest_path.display().to_string())
    }
}

#[derive(Debug, thiserror::Error)]
enum KeyError {
    #[error("key {0:?} is not URL-safe")]
    UnsafeKey(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Local destination for a key's converted document.
pub fn translation_path(langs_dir: &Path, key: &str) -> PathBuf {
    langs_dir.join(format!("{key}.{LOCAL_EXTENSION}"))
}

/// Runs one full sync: load keys, fetch-convert every key concurrently, write the manifest.
pub async fn synchronise<F>(config: &SyncConfig, fetcher: &F) -> Result<SyncReport, SyncError>
where
    F: Fetcher + ?Sized,
{
    info!("[SYNC] Starting translation sync");

    let keys = load_keys(&config.key_source)?;

    fs::create_dir_all(&config.langs_dir).await.map_err(|e| {
        error!(
            error = ?e,
            path = %config.langs_dir.display(),
            "[SYNC][ERROR] Failed to create translations directory"
        );
        SyncError::LangsDir {
            path: config.langs_dir.clone(),
            source: e,
        }
    })?;

    info!(keys = keys.len(), "[SYNC] Launching fetch-convert workers");
    let workers = keys
        .into_iter()
        .map(|key| process_key(fetcher, &config.langs_dir, key));
    // Wait for every worker, successful or not, before touching the manifest.
    let reports = join_all(workers).await;

    let mut translated = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for report in reports {
        match report.outcome {
            KeyOutcome::Saved { .. } => translated.push(report.key),
            KeyOutcome::Skipped { status } => skipped.push((report.key, status)),
            KeyOutcome::Failed { reason } => failed.push((report.key, reason)),
        }
    }
    let translated = sorted_keys(&translated);

    write_manifest(&config.manifest_path, &translated).await?;

    info!(
        translated = translated.len(),
        skipped = skipped.len(),
        failed = failed.len(),
        manifest = %config.manifest_path.display(),
        "[SYNC] Translation sync complete"
    );

    Ok(SyncReport {
        translated,
        skipped,
        failed,
        manifest_path: config.manifest_path.clone(),
    })
}

/// Fetches, converts and saves a single key. Never fails: every problem becomes part of the report.
pub async fn process_key<F>(fetcher: &F, langs_dir: &Path, key: LanguageKey) -> KeyReport
where
    F: Fetcher + ?Sized,
{
    let outcome = match fetch_convert_save(fetcher, langs_dir, &key).await {
        Ok(Step::Saved(path)) => {
            println!("✅ Saved {key}.{LOCAL_EXTENSION}");
            info!(key = %key, path = %path.display(), "[SYNC] Saved translation");
            KeyOutcome::Saved { path }
        }
        Ok(Step::Missing(status)) => {
            println!("⚠️ {key}.{REMOTE_EXTENSION} not found, skipping.");
            warn!(key = %key, status = status, "[SYNC] No translation available, skipping");
            KeyOutcome::Skipped { status }
        }
        Err(e) => {
            println!("❌ Error in {key}.{REMOTE_EXTENSION}: {e}");
            error!(key = %key, error = %e, "[SYNC][ERROR] Failed to process translation");
            KeyOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };
    KeyReport { key, outcome }
}

enum Step {
    Saved(PathBuf),
    Missing(u16),
}

async fn fetch_convert_save<F>(fetcher: &F, langs_dir: &Path, key: &str) -> Result<Step, KeyError>
where
    F: Fetcher + ?Sized,
{
    if !is_url_safe_key(key) {
        return Err(KeyError::UnsafeKey(key.to_string()));
    }

    let text = match fetcher.fetch(key).await? {
        FetchOutcome::Found(text) => text,
        FetchOutcome::Missing { status } => return Ok(Step::Missing(status)),
    };

    let json = yaml_to_json(&text)?;

    let path = translation_path(langs_dir, key);
    write_replacing(langs_dir, &path, json)
        .await
        .map_err(|source| KeyError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(Step::Saved(path))
}

/// Writes `contents` to a temporary file in `dir`, then renames it onto `path`.
/// A failed write leaves `path` untouched.
async fn write_replacing(dir: &Path, path: &Path, contents: String) -> std::io::Result<()> {
    let (dir, path) = (dir.to_path_buf(), path.to_path_buf());
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::other)?
}
