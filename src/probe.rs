//! Sequential model prober.
//!
//! Probes each testable model in catalog order, one request at a
//! time. Transport failures are captured per model and recorded as
//! failed results; they never abort the run. A fixed delay after each
//! probe avoids compounding any rate limiting the probes uncover.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::classifier::{classify_status, CheckResult};
use crate::gemini::GeminiClient;

/// Pause between consecutive probes.
pub const PROBE_DELAY: Duration = Duration::from_millis(500);

/// Probe every model in order and collect one result per model.
pub async fn probe_models(
    client: &GeminiClient,
    models: &[String],
    delay: Duration,
) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(models.len());

    for model in models {
        info!(model = %model, "🔍 Probing...");

        let result = match client.probe_model(model).await {
            Ok(status) => {
                let (success, label) = classify_status(status);
                if success {
                    info!(model = %model, "✅ OK");
                } else if status == 429 {
                    warn!(model = %model, "⏳ Rate limited");
                } else {
                    warn!(model = %model, label = %label, "❌ Failed");
                }
                CheckResult::new(success, model.clone(), label)
            }
            Err(e) => {
                warn!(model = %model, error = %e, "❌ Probe transport failure");
                CheckResult::new(false, model.clone(), format!("Exception: {}", e))
            }
        };

        results.push(result);
        sleep(delay).await;
    }

    results
}
