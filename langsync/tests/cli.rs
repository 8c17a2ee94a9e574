use assert_cmd::Command;
use langsync::cli::{run, Cli, Commands};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Writes a config whose paths all live under `dir` and returns its path.
fn write_config(dir: &Path, key_source: &Path, base_url: &str) -> PathBuf {
    let config_path = dir.join("langsync.yaml");
    let yaml = format!(
        "key_source: {}\nbase_url: \"{}\"\nlangs_dir: {}\nmanifest_path: {}\nrequest_timeout_secs: 5\n",
        key_source.display(),
        base_url,
        dir.join("langs").display(),
        dir.join("translatedLanguages.tsx").display(),
    );
    fs::write(&config_path, yaml).expect("Writing temp config failed");
    config_path
}

fn workspace() -> TempDir {
    tempdir().expect("Creating temp dir failed")
}

#[test]
fn sync_with_empty_key_source_writes_empty_manifest() {
    let dir = workspace();
    let key_source = dir.path().join("iso639-1.json");
    fs::write(&key_source, "{}").unwrap();
    let config = write_config(dir.path(), &key_source, "http://127.0.0.1:9/langs");

    let mut cmd = Command::cargo_bin("langsync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg(&config).current_dir(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Generated translatedLanguages.tsx with 0 languages",
        ));

    let manifest = fs::read_to_string(dir.path().join("translatedLanguages.tsx")).unwrap();
    assert!(manifest.starts_with("// Auto-generated file - DO NOT EDIT MANUALLY"));
    assert!(manifest.contains("export const TRANSLATED_LANGUAGES: string[] = [];"));
    assert!(dir.path().join("langs").is_dir());
}

/// Answers `/langs/en.yml` with a small document and every other path with 404.
async fn serve_translations() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let (status, body) = match request.split_whitespace().nth(1) {
                    Some("/langs/en.yml") => ("200 OK", "start: Hello\nping: Pong\n"),
                    _ => ("404 Not Found", "404: Not Found"),
                };
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}/langs")
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_prints_a_line_per_language_and_the_summary() {
    let base_url = serve_translations().await;
    let dir = workspace();
    let key_source = dir.path().join("iso639-1.json");
    fs::write(&key_source, r#"{"en": {"name": "English"}, "xx": {"name": "Unknown"}}"#).unwrap();
    let config = write_config(dir.path(), &key_source, &base_url);
    let root = dir.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        let mut cmd = Command::cargo_bin("langsync").expect("Binary exists");
        cmd.arg("sync").arg("--config").arg(&config).current_dir(&root);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("✅ Saved en.json"))
            .stdout(predicate::str::contains("⚠️ xx.yml not found, skipping."))
            .stdout(predicate::str::contains(
                "📄 Generated translatedLanguages.tsx with 1 languages",
            ));
    })
    .await
    .expect("langsync run panicked");

    let saved = fs::read_to_string(dir.path().join("langs").join("en.json")).unwrap();
    assert_eq!(saved, "{\n    \"start\": \"Hello\",\n    \"ping\": \"Pong\"\n}");
    assert!(!dir.path().join("langs").join("xx.json").exists());
    let manifest = fs::read_to_string(dir.path().join("translatedLanguages.tsx")).unwrap();
    assert!(manifest.contains("export const TRANSLATED_LANGUAGES: string[] = [\n  \"en\"\n];"));
}

#[test]
fn sync_tolerates_unreachable_host() {
    let dir = workspace();
    let key_source = dir.path().join("iso639-1.json");
    fs::write(&key_source, r#"{"en": {"name": "English"}}"#).unwrap();
    // Nothing listens on the discard port, so the request is refused.
    let config = write_config(dir.path(), &key_source, "http://127.0.0.1:9/langs");

    let mut cmd = Command::cargo_bin("langsync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg(&config).current_dir(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("❌ Error in en.yml"))
        .stdout(predicate::str::contains("with 0 languages"));
    assert!(!dir.path().join("langs").join("en.json").exists());
}

#[test]
fn sync_fails_when_key_source_is_missing() {
    let dir = workspace();
    let missing = dir.path().join("nope.json");
    let config = write_config(dir.path(), &missing, "http://127.0.0.1:9/langs");

    let mut cmd = Command::cargo_bin("langsync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg(&config).current_dir(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("key source"));
    assert!(!dir.path().join("translatedLanguages.tsx").exists());
}

#[test]
fn sync_fails_for_unreadable_config() {
    let dir = workspace();
    let mut cmd = Command::cargo_bin("langsync").expect("Binary exists");
    cmd.arg("sync")
        .arg("--config")
        .arg(dir.path().join("missing.yaml"))
        .current_dir(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

/// Records the `message` field of every event.
#[derive(Clone, Default)]
struct MessageRecorder {
    messages: Arc<Mutex<Vec<String>>>,
}

struct MessageField<'a>(&'a mut Option<String>);

impl Visit for MessageField<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for MessageRecorder {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = None;
        event.record(&mut MessageField(&mut message));
        if let Some(message) = message {
            self.messages.lock().unwrap().push(message);
        }
    }
}

#[tokio::test]
async fn run_announces_tracing_before_loading_config() {
    let recorder = MessageRecorder::default();
    let _guard = tracing::subscriber::set_default(Registry::default().with(recorder.clone()));

    // A missing config makes run() return before any request is made.
    let cli = Cli {
        command: Commands::Sync {
            config: Some(PathBuf::from("dummy.yaml")),
        },
    };
    assert!(run(cli).await.is_err());

    let messages = recorder.messages.lock().unwrap();
    assert_eq!(messages.first().map(String::as_str), Some("trace_initialised"), "{messages:?}");
}
