//! Key Source: reads the candidate language keys from a local JSON mapping.

use crate::contract::LanguageKey;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum KeySourceError {
    #[error("failed to read key source {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse key source {path:?} as JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("key source {path:?} must be a JSON object, found {found}")]
    NotAnObject { path: PathBuf, found: &'static str },
}

/// Loads the top-level keys of the JSON object at `path`, in document order.
///
/// The values are language metadata and are ignored here.
pub fn load_keys<P: AsRef<Path>>(path: P) -> Result<Vec<LanguageKey>, KeySourceError> {
    let path_ref = path.as_ref();
    info!(key_source = ?path_ref, "Loading language keys");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, key_source = ?path_ref, "Failed to read key source");
        KeySourceError::Read {
            path: path_ref.to_path_buf(),
            source: e,
        }
    })?;

    let keys = parse_keys(&content).map_err(|e| {
        error!(error = %e, key_source = ?path_ref, "Failed to parse key source");
        match e {
            ParseKeysError::Json(source) => KeySourceError::Parse {
                path: path_ref.to_path_buf(),
                source,
            },
            ParseKeysError::NotAnObject(found) => KeySourceError::NotAnObject {
                path: path_ref.to_path_buf(),
                found,
            },
        }
    })?;

    info!(count = keys.len(), "Loaded language keys");
    Ok(keys)
}

#[derive(Debug, thiserror::Error)]
enum ParseKeysError {
    #[error(transparent)]
    Json(serde_json::Error),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

fn parse_keys(content: &str) -> Result<Vec<LanguageKey>, ParseKeysError> {
    match serde_json::from_str::<Value>(content).map_err(ParseKeysError::Json)? {
        Value::Object(map) => Ok(map.into_iter().map(|(key, _)| key).collect()),
        other => Err(ParseKeysError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_come_back_in_document_order() {
        let keys = parse_keys(r#"{"fr": {"name": "French"}, "en": {}, "de": null}"#).unwrap();
        assert_eq!(keys, vec!["fr", "en", "de"]);
    }

    #[test]
    fn empty_object_has_no_keys() {
        assert!(parse_keys("{}").unwrap().is_empty());
    }

    #[test]
    fn array_is_rejected() {
        let err = parse_keys(r#"["en", "fr"]"#).unwrap_err();
        assert!(matches!(err, ParseKeysError::NotAnObject("an array")));
    }
}
