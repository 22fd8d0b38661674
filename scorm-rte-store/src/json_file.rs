//! One JSON document per attempt.

use chrono::{DateTime, Utc};
use scorm_rte_core::error::ScormError;
use scorm_rte_core::persistence::Persistence;
use scorm_rte_core::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// On-disk document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttemptDocument {
    attempt_id: String,
    saved_at: DateTime<Utc>,
    data: DataMap,
}

/// Stores the full data map of one attempt at `<dir>/<attempt_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_path: PathBuf,
    attempt_id: String,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(base_path: P, attempt_id: impl Into<String>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            attempt_id: attempt_id.into(),
        }
    }

    /// Path of the attempt document
    pub fn path(&self) -> PathBuf {
        self.base_path.join(format!("{}.json", self.attempt_id))
    }

    /// Remove the attempt document if present
    pub fn delete(&self) -> Result<(), ScormError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::info!("Deleted attempt document: {}", self.attempt_id);
        }
        Ok(())
    }
}

impl Persistence for JsonFileStore {
    fn info(&self) -> Arc<PersistenceInfo> {
        PersistenceInfo::new("json_file", "JSON file store")
    }

    fn load(&self) -> Result<DataMap, ScormError> {
        let path = self.path();

        if !path.exists() {
            tracing::debug!("No saved document for attempt: {}", self.attempt_id);
            return Ok(DataMap::new());
        }

        let content = std::fs::read_to_string(&path)?;
        let document: AttemptDocument = serde_json::from_str(&content)?;

        tracing::debug!(
            "Loaded attempt {} saved at {}",
            document.attempt_id,
            document.saved_at
        );
        Ok(document.data)
    }

    fn save(&self, data: &DataMap) -> Result<(), ScormError> {
        std::fs::create_dir_all(&self.base_path)?;
        let path = self.path();

        let document = AttemptDocument {
            attempt_id: self.attempt_id.clone(),
            saved_at: Utc::now(),
            data: data.clone(),
        };

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        let content = serde_json::to_string_pretty(&document)?;

        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved attempt {} ({} entries)", self.attempt_id, data.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lifecycle() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("attempts"), "attempt-1");

        assert!(store.load().unwrap().is_empty());

        let mut data = DataMap::new();
        data.insert("cmi.core.lesson_location".into(), "page-4".into());
        data.insert("cmi.suspend_data".into(), "{\"q\":[1,2]}".into());
        store.save(&data).unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("tmp").exists());
        assert_eq!(store.load().unwrap(), data);

        store.delete().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path(), "broken");
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, ScormError::Serialization(_)));
    }
}
