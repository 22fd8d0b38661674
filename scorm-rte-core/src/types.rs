//! Core types for the runtime adapter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Element name to value mapping, as exchanged with persistence collaborators
pub type DataMap = BTreeMap<String, String>;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotInitialized,
    Initialized,
    Terminated,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::NotInitialized
    }
}

/// API operation exposed to content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiCall {
    Initialize,
    Terminate,
    GetValue,
    SetValue,
    Commit,
    GetLastError,
    GetErrorString,
    GetDiagnostic,
}

impl ApiCall {
    /// Resolve a method name as used by SCORM 1.2 (`LMSInitialize`, `LMSFinish`, ...)
    /// or SCORM 2004 (`Initialize`, `Terminate`, ...) content
    pub fn from_method(name: &str) -> Option<Self> {
        let call = match name {
            "LMSInitialize" | "Initialize" => ApiCall::Initialize,
            "LMSFinish" | "Terminate" => ApiCall::Terminate,
            "LMSGetValue" | "GetValue" => ApiCall::GetValue,
            "LMSSetValue" | "SetValue" => ApiCall::SetValue,
            "LMSCommit" | "Commit" => ApiCall::Commit,
            "LMSGetLastError" | "GetLastError" => ApiCall::GetLastError,
            "LMSGetErrorString" | "GetErrorString" => ApiCall::GetErrorString,
            "LMSGetDiagnostic" | "GetDiagnostic" => ApiCall::GetDiagnostic,
            _ => return None,
        };
        Some(call)
    }

    /// SCORM 1.2 method name
    pub fn lms_name(&self) -> &'static str {
        match self {
            ApiCall::Initialize => "LMSInitialize",
            ApiCall::Terminate => "LMSFinish",
            ApiCall::GetValue => "LMSGetValue",
            ApiCall::SetValue => "LMSSetValue",
            ApiCall::Commit => "LMSCommit",
            ApiCall::GetLastError => "LMSGetLastError",
            ApiCall::GetErrorString => "LMSGetErrorString",
            ApiCall::GetDiagnostic => "LMSGetDiagnostic",
        }
    }
}

/// Persistence collaborator information
#[derive(Debug, Clone)]
pub struct PersistenceInfo {
    pub id: String,
    pub name: String,
}

impl PersistenceInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            name: name.into(),
        })
    }
}

/// Context shared with observers for every event of one adapter instance
#[derive(Debug, Clone)]
pub struct EventContext {
    pub session_id: String,
    pub persistence_id: String,
}

impl EventContext {
    /// Create a new context with a fresh session id
    pub fn new(persistence_id: impl Into<String>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            persistence_id: persistence_id.into(),
        }
    }
}

/// Structured event emitted to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AdapterEvent {
    /// An API call completed
    Call {
        call: ApiCall,
        #[serde(skip_serializing_if = "Option::is_none")]
        element: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        result: String,
        error_code: String,
    },
    /// The session state changed
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    /// The store was handed to the persistence collaborator
    Committed {
        entries: usize,
        success: bool,
    },
}

/// Aggregated view of an attempt's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub completion_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub is_complete: bool,
}

impl AttemptSummary {
    /// Build a summary from raw store contents
    pub fn from_data(data: &DataMap) -> Self {
        let completion_status = data
            .get("cmi.core.lesson_status")
            .cloned()
            .unwrap_or_else(|| "not attempted".to_string());
        let score = data
            .get("cmi.core.score.raw")
            .and_then(|raw| raw.trim().parse::<f64>().ok());
        let is_complete = matches!(completion_status.as_str(), "completed" | "passed");

        Self {
            completion_status,
            score,
            is_complete,
        }
    }
}
