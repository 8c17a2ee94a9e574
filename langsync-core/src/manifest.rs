//! Manifest Generator: renders the generated TypeScript module that lists translated languages.
//!
//! The output is a pure function of the success set, so every run rewrites the
//! whole file and two runs with the same successes produce identical bytes.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to create manifest directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode language list: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sorted, duplicate-free copy of `keys`.
pub fn sorted_keys<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    let mut sorted: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
    sorted.sort();
    sorted.dedup();
    sorted
}

/// Renders the manifest source for `keys`.
pub fn render_manifest<S: AsRef<str>>(keys: &[S]) -> Result<String, ManifestError> {
    let languages = serde_json::to_string_pretty(&sorted_keys(keys))?;
    Ok(format!(
        r#"// Auto-generated file - DO NOT EDIT MANUALLY
// This file is generated during the build process

export const TRANSLATED_LANGUAGES: string[] = {languages};

export const getTranslatedLanguages = (): string[] => {{
  return TRANSLATED_LANGUAGES;
}};

export const isLanguageTranslated = (code: string): boolean => {{
  return TRANSLATED_LANGUAGES.includes(code.toLowerCase());
}};
"#
    ))
}

/// Replaces the file at `path` with the rendered manifest.
pub async fn write_manifest<S: AsRef<str>>(path: &Path, keys: &[S]) -> Result<(), ManifestError> {
    let content = render_manifest(keys)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            error!(error = ?e, path = %parent.display(), "Failed to create manifest directory");
            ManifestError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            }
        })?;
    }

    fs::write(path, content).await.map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write manifest");
        ManifestError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    info!(path = %path.display(), languages = keys.len(), "Wrote language manifest");
    Ok(())
}

/// Same check as the generated `isLanguageTranslated`: lowercase, then look up.
pub fn is_language_translated<S: AsRef<str>>(keys: &[S], code: &str) -> bool {
    let code = code.to_lowercase();
    keys.iter().any(|k| k.as_ref() == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_keys_sorts_and_dedups() {
        assert_eq!(sorted_keys(&["fr", "en", "de", "en"]), vec!["de", "en", "fr"]);
    }

    #[test]
    fn lookup_lowercases_the_input_only() {
        let keys = ["en", "pt_br"];
        assert!(is_language_translated(&keys, "EN"));
        assert!(is_language_translated(&keys, "pt_BR"));
        assert!(!is_language_translated(&keys, "fr"));
        assert!(!is_language_translated(&["pt_BR"], "pt_BR"));
    }
}
