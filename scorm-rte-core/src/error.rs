//! Error types for the SCORM runtime.
//!
//! Two families live here:
//! - [`ScormError`]: Rust-side failures raised by collaborators (stores,
//!   configuration loading). These never cross the SCORM API boundary.
//! - [`ErrorKind`]: the SCORM error taxonomy written to the adapter's error
//!   register and translated to numeric codes by an
//!   [`ErrorCodeTable`](crate::codes::ErrorCodeTable).

use serde::{Deserialize, Serialize};

/// The main error type for collaborator operations.
#[derive(Debug, thiserror::Error)]
pub enum ScormError {
    /// Persistence backend errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ScormError {
    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScormError::Io(_) | ScormError::Timeout(_))
    }
}

/// SCORM error taxonomy.
///
/// Every adapter operation records exactly one of these (or none, on
/// success) in the error register before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A data call was made outside an active session
    NotInitializedYet,
    /// Initialize called on an active session
    AlreadyInitialized,
    /// Initialize called after the session finished
    AlreadyTerminated,
    /// Element name is not part of the namespace
    UnknownElement,
    /// Malformed call argument, e.g. an array index that skips ahead
    InvalidArgument,
    /// SetValue on a keyword element (`_version`, `_children`, `_count`)
    KeywordElement,
    /// SetValue on a read-only element
    ReadOnlyElement,
    /// GetValue on a write-only element
    WriteOnlyElement,
    /// Value does not parse as the element's data type
    TypeMismatch,
    /// Value parses but lies outside the allowed range
    RangeOutOfBounds,
    /// The persistence collaborator failed
    PersistenceFailure,
    /// Anything else, e.g. an unknown API method name
    GeneralException,
}

impl ErrorKind {
    /// All kinds, in declaration order
    pub const ALL: [ErrorKind; 12] = [
        ErrorKind::NotInitializedYet,
        ErrorKind::AlreadyInitialized,
        ErrorKind::AlreadyTerminated,
        ErrorKind::UnknownElement,
        ErrorKind::InvalidArgument,
        ErrorKind::KeywordElement,
        ErrorKind::ReadOnlyElement,
        ErrorKind::WriteOnlyElement,
        ErrorKind::TypeMismatch,
        ErrorKind::RangeOutOfBounds,
        ErrorKind::PersistenceFailure,
        ErrorKind::GeneralException,
    ];
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NotInitializedYet => "not initialized",
            ErrorKind::AlreadyInitialized => "already initialized",
            ErrorKind::AlreadyTerminated => "already terminated",
            ErrorKind::UnknownElement => "unknown element",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::KeywordElement => "keyword element",
            ErrorKind::ReadOnlyElement => "read-only element",
            ErrorKind::WriteOnlyElement => "write-only element",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::RangeOutOfBounds => "range out of bounds",
            ErrorKind::PersistenceFailure => "persistence failure",
            ErrorKind::GeneralException => "general exception",
        };
        f.write_str(name)
    }
}

/// A taxonomy kind together with a diagnostic message.
///
/// Produced by validation and persistence paths inside the adapter; the
/// message ends up behind `GetDiagnostic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: ErrorKind,
    pub diagnostic: String,
}

impl Fault {
    pub fn new(kind: ErrorKind, diagnostic: impl Into<String>) -> Self {
        Self {
            kind,
            diagnostic: diagnostic.into(),
        }
    }
}

impl From<ScormError> for Fault {
    fn from(err: ScormError) -> Self {
        Fault::new(ErrorKind::PersistenceFailure, err.to_string())
    }
}
