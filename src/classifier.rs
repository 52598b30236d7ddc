//! Response classifier — maps an HTTP status code to a normalized
//! check outcome.
//!
//! This is a total function over all status codes: 200 is the only
//! success, 429 gets its own label so the dashboard can distinguish
//! quota exhaustion from genuine errors, everything else is lumped
//! into a generic error label carrying the raw code.

use serde::{Deserialize, Serialize};

/// The outcome of probing a single model in one run.
///
/// Field order matters for the JSON summary shape:
/// `{"success": ..., "model": ..., "status": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub success: bool,
    pub model: String,
    pub status: String,
}

impl CheckResult {
    pub fn new(success: bool, model: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            success,
            model: model.into(),
            status: status.into(),
        }
    }
}

/// Classify an HTTP status code into `(success, label)`.
pub fn classify_status(status: u16) -> (bool, String) {
    match status {
        200 => (true, "OK".to_string()),
        429 => (false, "Rate Limit (429)".to_string()),
        code => (false, format!("Error {}", code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_status() {
        assert_eq!(classify_status(200), (true, "OK".to_string()));
    }

    #[test]
    fn test_rate_limit_status() {
        assert_eq!(classify_status(429), (false, "Rate Limit (429)".to_string()));
    }

    #[test]
    fn test_other_statuses_are_errors() {
        for code in [400, 401, 403, 404, 500, 503, 0, 999] {
            let (success, label) = classify_status(code);
            assert!(!success);
            assert_eq!(label, format!("Error {}", code));
        }
    }

    #[test]
    fn test_results_round_trip_through_json() {
        let results = vec![
            CheckResult::new(true, "models/gemini-2.5-flash", "OK"),
            CheckResult::new(false, "models/gemini-2.0-flash", "Rate Limit (429)"),
        ];

        let json = serde_json::to_string(&results).unwrap();
        let decoded: Vec<CheckResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, results);
    }

    #[test]
    fn test_result_serializes_with_expected_field_order() {
        let json = serde_json::to_string(&CheckResult::new(true, "m", "OK")).unwrap();
        assert_eq!(json, r#"{"success":true,"model":"m","status":"OK"}"#);
    }
}
