//! Adapter configuration.

use crate::codes::ErrorCodeTable;
use crate::error::ScormError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// SCORM edition the adapter speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum ScormVersion {
    #[default]
    #[serde(rename = "1.2")]
    Scorm12,
    #[serde(rename = "2004")]
    Scorm2004,
}

impl ScormVersion {
    /// Name under which content looks up the adapter object
    pub fn api_object_name(&self) -> &'static str {
        match self {
            ScormVersion::Scorm12 => "API",
            ScormVersion::Scorm2004 => "API_1484_11",
        }
    }

    /// Error code table for this edition
    pub fn error_codes(&self) -> ErrorCodeTable {
        match self {
            ScormVersion::Scorm12 => ErrorCodeTable::scorm12(),
            ScormVersion::Scorm2004 => ErrorCodeTable::scorm2004(),
        }
    }

    /// Parse the `schemaversion` string found in package manifests
    pub fn from_schema_version(version: &str) -> Option<Self> {
        match version.trim() {
            "1.2" => Some(ScormVersion::Scorm12),
            v if v.starts_with("2004") || v.starts_with("CAM 1.3") => Some(ScormVersion::Scorm2004),
            _ => None,
        }
    }
}

/// How strictly element names and values are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    #[default]
    Strict,
    Permissive,
}

/// Learner identity seeded into the read-only `cmi.core.student_*` elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct LearnerInfo {
    pub student_id: String,
    pub student_name: String,
}

/// Adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct AdapterConfig {
    /// SCORM edition, selects the error code table
    pub version: ScormVersion,

    /// Element and value validation
    pub validation: ValidationMode,

    /// Reject non-empty parameters to Initialize/Terminate/Commit with 201
    pub strict_arguments: bool,

    /// Flush unsaved values when the session terminates
    pub commit_on_terminate: bool,

    /// Upper bound for blocking on asynchronous persistence, in milliseconds.
    /// Applied by `BlockingStore::from_config` in `scorm-rte-store`.
    pub commit_timeout_ms: u64,

    /// Learner identity
    pub learner: LearnerInfo,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            version: ScormVersion::default(),
            validation: ValidationMode::default(),
            strict_arguments: false,
            commit_on_terminate: true,
            commit_timeout_ms: 5_000,
            learner: LearnerInfo::default(),
        }
    }
}

impl AdapterConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ScormError> {
        let config: AdapterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<(), ScormError> {
        if self.commit_timeout_ms == 0 {
            return Err(ScormError::configuration(
                "commit_timeout_ms must be greater than zero",
            ));
        }
        if self.learner.student_id.chars().any(char::is_whitespace) {
            return Err(ScormError::configuration(
                "learner.student_id must not contain whitespace",
            ));
        }
        Ok(())
    }

    /// Set SCORM edition
    pub fn with_version(mut self, version: ScormVersion) -> Self {
        self.version = version;
        self
    }

    /// Set validation mode
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Reject non-empty lifecycle parameters
    pub fn with_strict_arguments(mut self, strict: bool) -> Self {
        self.strict_arguments = strict;
        self
    }

    /// Set implicit commit on terminate
    pub fn with_commit_on_terminate(mut self, commit: bool) -> Self {
        self.commit_on_terminate = commit;
        self
    }

    /// Set the persistence timeout
    pub fn with_commit_timeout(mut self, timeout: Duration) -> Self {
        self.commit_timeout_ms = timeout.as_millis().max(1) as u64;
        self
    }

    /// Set learner identity
    pub fn with_learner(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.learner = LearnerInfo {
            student_id: id.into(),
            student_name: name.into(),
        };
        self
    }

    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::default();
        assert_eq!(config.version, ScormVersion::Scorm12);
        assert_eq!(config.validation, ValidationMode::Strict);
        assert!(config.commit_on_terminate);
        assert!(!config.strict_arguments);
        assert_eq!(config.commit_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_json_partial() {
        let config = AdapterConfig::from_json(
            r#"{"version": "2004", "validation": "permissive",
                "learner": {"student_id": "u-42", "student_name": "Doe, Jane"}}"#,
        )
        .unwrap();
        assert_eq!(config.version, ScormVersion::Scorm2004);
        assert_eq!(config.validation, ValidationMode::Permissive);
        assert_eq!(config.learner.student_name, "Doe, Jane");
        assert!(config.commit_on_terminate);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(AdapterConfig::from_json(r#"{"commit_timeout_ms": 0}"#).is_err());
        assert!(AdapterConfig::from_json(r#"{"version": "3.0"}"#).is_err());
        assert!(AdapterConfig::from_json(
            r#"{"learner": {"student_id": "a b", "student_name": ""}}"#
        )
        .is_err());
    }

    #[test]
    fn test_version_helpers() {
        assert_eq!(ScormVersion::Scorm12.api_object_name(), "API");
        assert_eq!(ScormVersion::Scorm2004.api_object_name(), "API_1484_11");
        assert_eq!(
            ScormVersion::from_schema_version("1.2"),
            Some(ScormVersion::Scorm12)
        );
        assert_eq!(
            ScormVersion::from_schema_version("2004 4th Edition"),
            Some(ScormVersion::Scorm2004)
        );
        assert_eq!(ScormVersion::from_schema_version("tincan"), None);
    }

    #[test]
    fn test_builder_setters() {
        let config = AdapterConfig::new()
            .with_validation(ValidationMode::Permissive)
            .with_strict_arguments(true)
            .with_commit_on_terminate(false)
            .with_commit_timeout(Duration::from_millis(250))
            .with_learner("s1", "Student One");
        assert!(config.strict_arguments);
        assert!(!config.commit_on_terminate);
        assert_eq!(config.commit_timeout_ms, 250);
        assert_eq!(config.learner.student_id, "s1");
        assert!(config.validate().is_ok());
    }
}
