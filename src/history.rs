//! Bounded run history, persisted as a human-readable JSON array.
//!
//! One entry per run, capped at the 50 most recent; the oldest entry
//! is dropped on overflow. Load is tolerant: a missing or corrupt
//! file is treated as an empty history with a logged warning, and the
//! next write replaces it. Plain read-modify-write with no locking —
//! concurrent invocations are not supported.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::classifier::CheckResult;

/// Maximum number of retained runs.
pub const MAX_ENTRIES: usize = 50;

/// Per-model detail within a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDetail {
    pub model: String,
    pub status: String,
    pub success: bool,
}

/// One persisted run: when it happened and how each model fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub total: usize,
    pub success: usize,
    pub details: Vec<RunDetail>,
}

impl HistoryEntry {
    /// Build an entry from a run's results, stamped with `timestamp`.
    pub fn from_results(timestamp: String, results: &[CheckResult]) -> Self {
        Self {
            timestamp,
            total: results.len(),
            success: results.iter().filter(|r| r.success).count(),
            details: results
                .iter()
                .map(|r| RunDetail {
                    model: r.model.clone(),
                    status: r.status.clone(),
                    success: r.success,
                })
                .collect(),
        }
    }
}

/// The history file, oldest entry first.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all retained entries. Missing or unreadable files yield an
    /// empty history; the next append overwrites them.
    pub fn load(&self) -> Vec<HistoryEntry> {
        if !self.path.exists() {
            return Vec::new();
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read history — treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "History file is corrupt — treating as empty");
                Vec::new()
            }
        }
    }

    /// Append one run to the history, truncating to the most recent
    /// [`MAX_ENTRIES`], and write the full list back.
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut history = self.load();
        history.push(entry);

        if history.len() > MAX_ENTRIES {
            let excess = history.len() - MAX_ENTRIES;
            history.drain(..excess);
        }

        let json = serde_json::to_string_pretty(&history)
            .context("Failed to serialize history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history to {}", self.path.display()))?;

        info!(path = %self.path.display(), runs = history.len(), "History updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CheckResult;
    use tempfile::tempdir;

    fn entry(ts: &str, ok: usize, total: usize) -> HistoryEntry {
        HistoryEntry {
            timestamp: ts.to_string(),
            total,
            success: ok,
            details: Vec::new(),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{not json").unwrap();

        let store = HistoryStore::new(&path);
        assert!(store.load().is_empty());

        // The next append replaces the corrupt file with fresh data.
        store.append(entry("2026-01-01T00:00:00", 1, 1)).unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_append_persists_oldest_first() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        store.append(entry("2026-01-01T00:00:00", 1, 2)).unwrap();
        store.append(entry("2026-01-02T00:00:00", 2, 2)).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].timestamp, "2026-01-01T00:00:00");
        assert_eq!(loaded[1].timestamp, "2026-01-02T00:00:00");
    }

    #[test]
    fn test_truncates_to_most_recent_50() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        for i in 0..MAX_ENTRIES {
            store.append(entry(&format!("run-{:03}", i), 1, 1)).unwrap();
        }
        assert_eq!(store.load().len(), MAX_ENTRIES);

        store.append(entry("run-050", 1, 1)).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), MAX_ENTRIES);
        assert_eq!(loaded[0].timestamp, "run-001", "oldest entry dropped");
        assert_eq!(loaded[MAX_ENTRIES - 1].timestamp, "run-050", "newest entry kept");
    }

    #[test]
    fn test_entry_from_results_counts_successes() {
        let results = vec![
            CheckResult::new(true, "models/a", "OK"),
            CheckResult::new(false, "models/b", "Rate Limit (429)"),
            CheckResult::new(true, "models/c", "OK"),
        ];
        let entry = HistoryEntry::from_results("2026-01-01T00:00:00".into(), &results);

        assert_eq!(entry.total, 3);
        assert_eq!(entry.success, 2);
        assert!(entry.success <= entry.total);
        assert_eq!(entry.details[1].status, "Rate Limit (429)");
    }

    #[test]
    fn test_history_file_is_pretty_printed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = HistoryStore::new(&path);
        store.append(entry("2026-01-01T00:00:00", 0, 0)).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'), "expected indented output");
    }
}
