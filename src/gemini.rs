//! Thin client for the generativelanguage REST API.
//!
//! Two endpoints only: the model listing (fail-fast — a bad response
//! aborts the whole run) and the per-model generateContent probe,
//! which just reports the raw status code for classification.

use anyhow::{Context, Result};
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request timeout for both the listing and the probes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch the model catalog. Non-200 responses are errors carrying
    /// the status and a truncated body.
    pub async fn fetch_catalog(&self) -> Result<crate::catalog::ModelCatalog> {
        let url = format!("{}/models?key={}", self.base_url, self.api_key);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Model listing request failed")?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "Error fetching models ({}): {}",
                status,
                &body[..body.len().min(500)]
            );
        }

        resp.json()
            .await
            .context("Model listing response was not valid JSON")
    }

    /// Send a minimal generation request to one model and return the
    /// HTTP status code. `model` keeps its `models/` prefix.
    pub async fn probe_model(&self, model: &str) -> Result<u16> {
        let url = format!("{}/{}:generateContent?key={}", self.base_url, model, self.api_key);
        let body = json!({
            "contents": [{"parts": [{"text": "Hello"}]}]
        });

        let resp = self.http.post(&url).json(&body).send().await?;
        Ok(resp.status().as_u16())
    }
}
