//! Run orchestration — one sequential pass per invocation.
//!
//! Sequence: credential check, catalog fetch, filter, probe, persist
//! history, render report, optional JSON summary. The first two steps
//! are fail-fast (typed errors, nothing written); everything after the
//! catalog fetch is fail-soft, with per-model failures recorded as
//! data rather than aborting the run.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::catalog::extract_testable_models;
use crate::classifier::CheckResult;
use crate::gemini::{self, GeminiClient};
use crate::history::{HistoryEntry, HistoryStore};
use crate::probe::{self, probe_models};
use crate::report;

pub const HISTORY_FILE: &str = "gemini_rate_history.json";
pub const REPORT_FILE: &str = "gemini_rate_check_results.html";

/// The two fatal setup failures. Everything downstream is fail-soft.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("GEMINI_API_KEY not found in environment or .env file")]
    MissingApiKey,
    #[error("Catalog fetch failed: {0}")]
    Catalog(anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Everything a run needs, resolved up front so tests can redirect
/// the endpoint and the output files.
pub struct CheckConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub history_path: PathBuf,
    pub report_path: PathBuf,
    pub json_out: Option<PathBuf>,
    pub write_html: bool,
    pub probe_delay: Duration,
}

impl CheckConfig {
    /// Production defaults: credential from the environment (after a
    /// `.env` load in main), files in the working directory.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
            history_path: PathBuf::from(HISTORY_FILE),
            report_path: PathBuf::from(REPORT_FILE),
            json_out: None,
            write_html: true,
            probe_delay: probe::PROBE_DELAY,
        }
    }
}

/// Flat summary of the current run only, for the optional JSON output.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    timestamp: &'a str,
    total: usize,
    success: usize,
    results: &'a [CheckResult],
}

fn local_timestamp() -> String {
    // ISO-8601 without offset, lexicographically sortable.
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Execute one full check pass.
pub async fn run_check(config: &CheckConfig) -> Result<(), RunError> {
    let api_key = config.api_key.as_deref().ok_or(RunError::MissingApiKey)?;

    info!("🚀 Starting Gemini model rate check...");
    let client = GeminiClient::new(&config.base_url, api_key)?;

    let catalog = client.fetch_catalog().await.map_err(RunError::Catalog)?;
    let model_names = extract_testable_models(&catalog);
    info!(
        catalog = catalog.models.len(),
        testable = model_names.len(),
        "📦 Catalog fetched"
    );

    let results = probe_models(&client, &model_names, config.probe_delay).await;
    let successes = results.iter().filter(|r| r.success).count();
    info!(
        total = results.len(),
        success = successes,
        "📊 Run complete"
    );

    let timestamp = local_timestamp();

    let store = HistoryStore::new(&config.history_path);
    store.append(HistoryEntry::from_results(timestamp.clone(), &results))?;

    if config.write_html {
        let history = store.load();
        report::write_report(&config.report_path, &history, &results, Local::now())?;
    }

    if let Some(json_out) = &config.json_out {
        write_summary(json_out, &timestamp, &results)?;
    }

    Ok(())
}

/// Write the current run's flat JSON summary, creating parent
/// directories as needed.
fn write_summary(path: &Path, timestamp: &str, results: &[CheckResult]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let summary = RunSummary {
        timestamp,
        total: results.len(),
        success: results.iter().filter(|r| r.success).count(),
        results,
    };
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;

    info!(path = %path.display(), "JSON report generated");
    Ok(())
}
