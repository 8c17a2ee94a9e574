use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_KEY_SOURCE: &str = "src/data/iso639-1.json";
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/TheTeamVivek/YukkiMusic/master/strings/langs";
pub const DEFAULT_LANGS_DIR: &str = "src/data/langs";
pub const DEFAULT_MANIFEST_PATH: &str = "src/data/translatedLanguages.tsx";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where keys come from, where translations are fetched from, and where the outputs land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// JSON file whose top-level keys are the language codes to try.
    #[serde(default = "default_key_source")]
    pub key_source: PathBuf,
    /// Remote directory holding `{key}.yml` documents.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Destination directory for `{key}.json` files.
    #[serde(default = "default_langs_dir")]
    pub langs_dir: PathBuf,
    /// Generated manifest source file.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,
    /// Per-request timeout; `None` waits forever.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            key_source: default_key_source(),
            base_url: default_base_url(),
            langs_dir: default_langs_dir(),
            manifest_path: default_manifest_path(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SyncConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn trace_loaded(&self) {
        info!(
            key_source = %self.key_source.display(),
            base_url = %self.base_url,
            langs_dir = %self.langs_dir.display(),
            manifest_path = %self.manifest_path.display(),
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}

fn default_key_source() -> PathBuf {
    PathBuf::from(DEFAULT_KEY_SOURCE)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_langs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LANGS_DIR)
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST_PATH)
}

fn default_request_timeout_secs() -> Option<u64> {
    Some(DEFAULT_REQUEST_TIMEOUT_SECS)
}
