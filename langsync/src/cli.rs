//!
//! This module implements the CLI interface for langsync: command parsing, config
//! selection and the user-visible summary.
//!
//! All pipeline logic (key loading, fetching, conversion, manifest generation) lives in
//! the [`langsync-core`] crate. This module is strictly glue.
//!
//! ## How To Use
//! - For command-line users: run `langsync sync` from the project root, optionally with
//!   `--config langsync.yaml`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
//!
//! [`langsync-core`]: ../../langsync-core/
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use langsync_core::config::SyncConfig;
use langsync_core::download::HttpFetcher;
use langsync_core::synchronise::synchronise;
use std::path::PathBuf;

/// CLI for langsync: sync remote translations into local JSON and a generated manifest.
#[derive(Parser)]
#[clap(
    name = "langsync",
    version,
    about = "Sync per-language YAML translations into local JSON and a language manifest"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every language in the key source and regenerate the manifest
    Sync {
        /// Path to a YAML config file; built-in defaults are used when omitted
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Runs the parsed command to completion.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config } => {
            let config = match config {
                Some(path) => load_config(path)?,
                None => {
                    tracing::info!("No config file given, using built-in defaults");
                    SyncConfig::default()
                }
            };
            config.trace_loaded();

            tracing::info!(command = "sync", "Starting translation sync");
            let fetcher = HttpFetcher::new(config.base_url.clone(), config.request_timeout())
                .context("Failed to construct http fetcher")?;

            match synchronise(&config, &fetcher).await {
                Ok(report) => {
                    println!(
                        "\n📄 Generated {} with {} languages",
                        report.manifest_file_name(),
                        report.translated.len()
                    );
                    tracing::info!(command = "sync", ?report, "Translation sync complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Translation sync failed");
                    Err(anyhow::Error::new(e).context("Translation sync failed"))
                }
            }
        }
    }
}
