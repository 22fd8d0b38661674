//! Append-only progress log.
//!
//! Layout: `<root>/<user_id>/<attempt_id>/progress.json`, holding a JSON array
//! of `{"timestamp": ..., "data": {"element_id": ..., "value": ...}}` entries.
//! Replaying the log in order (last write wins) yields the attempt's data.
//! Elements dropped from a saved snapshot are logged with an empty value.

use chrono::{DateTime, Utc};
use scorm_rte_core::error::ScormError;
use scorm_rte_core::persistence::Persistence;
use scorm_rte_core::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const LOG_FILE: &str = "progress.json";

/// One element update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementUpdate {
    pub element_id: String,
    pub value: String,
}

/// One timestamped log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub data: ElementUpdate,
}

/// Progress log for one learner and attempt.
#[derive(Debug, Clone)]
pub struct ProgressLogStore {
    root: PathBuf,
    user_id: String,
    attempt_id: String,
}

impl ProgressLogStore {
    pub fn new<P: AsRef<Path>>(
        root: P,
        user_id: impl Into<String>,
        attempt_id: impl Into<String>,
    ) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            user_id: user_id.into(),
            attempt_id: attempt_id.into(),
        }
    }

    /// Path of the log file
    pub fn path(&self) -> PathBuf {
        log_path(&self.root, &self.user_id, &self.attempt_id)
    }

    /// All entries in append order.
    ///
    /// A missing log is empty. A corrupt log is logged and treated as empty.
    pub fn entries(&self) -> Result<Vec<LogEntry>, ScormError> {
        let path = self.path();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Progress log not found: {}", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::error!(
                    "Corrupted JSON in {}: {}. Treating as empty.",
                    path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Aggregated progress of the attempt
    pub fn summary(&self) -> Result<AttemptSummary, ScormError> {
        Ok(AttemptSummary::from_data(&self.load()?))
    }

    /// Move the log to `<archive_root>/<user_id>/<attempt_id>/progress.json`
    pub fn archive<P: AsRef<Path>>(&self, archive_root: P) -> Result<PathBuf, ScormError> {
        let target = log_path(archive_root.as_ref(), &self.user_id, &self.attempt_id);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(self.path(), &target)?;

        tracing::info!(
            "Archived progress log: {} to {}",
            self.path().display(),
            target.display()
        );
        Ok(target)
    }

    fn write_entries(&self, entries: &[LogEntry]) -> Result<(), ScormError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

fn log_path(root: &Path, user_id: &str, attempt_id: &str) -> PathBuf {
    root.join(user_id).join(attempt_id).join(LOG_FILE)
}

fn replay(entries: &[LogEntry]) -> DataMap {
    entries
        .iter()
        .map(|e| (e.data.element_id.clone(), e.data.value.clone()))
        .collect()
}

impl Persistence for ProgressLogStore {
    fn info(&self) -> Arc<PersistenceInfo> {
        PersistenceInfo::new("progress_log", "Progress log store")
    }

    fn load(&self) -> Result<DataMap, ScormError> {
        Ok(replay(&self.entries()?))
    }

    fn save(&self, data: &DataMap) -> Result<(), ScormError> {
        let mut entries = self.entries()?;
        let current = replay(&entries);
        let timestamp = Utc::now();

        let changed = data
            .iter()
            .filter(|(element, value)| current.get(*element) != Some(*value))
            .map(|(element, value)| (element.as_str(), value.as_str()));
        let cleared = current
            .iter()
            .filter(|(element, value)| !value.is_empty() && !data.contains_key(*element))
            .map(|(element, _)| (element.as_str(), ""));
        let updates: Vec<LogEntry> = changed
            .chain(cleared)
            .map(|(element, value)| LogEntry {
                timestamp,
                data: ElementUpdate {
                    element_id: element.to_string(),
                    value: value.to_string(),
                },
            })
            .collect();

        let appended = updates.len();
        if appended == 0 {
            tracing::debug!("Progress log unchanged for attempt {}", self.attempt_id);
            return Ok(());
        }
        entries.extend(updates);

        self.write_entries(&entries)?;
        tracing::debug!(
            "Appended {} entries to progress log of user {} attempt {}",
            appended,
            self.user_id,
            self.attempt_id
        );
        Ok(())
    }
}
