//! Error code tables.
//!
//! Maps the [`ErrorKind`] taxonomy to the numeric codes content sees through
//! `GetLastError`, and codes to the fixed descriptions behind
//! `GetErrorString`.

use crate::error::ErrorKind;
use crate::types::ApiCall;
use std::collections::{BTreeMap, HashMap};

/// Code reported on success
pub const NO_ERROR: &str = "0";

/// Kind to code and code to description mapping for one SCORM edition
#[derive(Debug, Clone)]
pub struct ErrorCodeTable {
    codes: HashMap<ErrorKind, String>,
    /// Per-call overrides, keyed by (kind, call, session terminated)
    contextual: HashMap<(ErrorKind, ApiCall, bool), String>,
    descriptions: BTreeMap<String, String>,
}

impl ErrorCodeTable {
    /// Build a table from explicit mappings
    pub fn new(
        codes: impl IntoIterator<Item = (ErrorKind, &'static str)>,
        descriptions: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        let mut descriptions: BTreeMap<String, String> = descriptions
            .into_iter()
            .map(|(c, d)| (c.to_string(), d.to_string()))
            .collect();
        descriptions
            .entry(NO_ERROR.to_string())
            .or_insert_with(|| "No error".to_string());

        Self {
            codes: codes
                .into_iter()
                .map(|(k, c)| (k, c.to_string()))
                .collect(),
            contextual: HashMap::new(),
            descriptions,
        }
    }

    /// Override the code for `kind` when raised by `call`
    pub fn with_contextual(
        mut self,
        kind: ErrorKind,
        call: ApiCall,
        terminated: bool,
        code: &str,
    ) -> Self {
        self.contextual
            .insert((kind, call, terminated), code.to_string());
        self
    }

    /// SCORM 1.2 codes.
    ///
    /// 1.2 has no dedicated range code, so out-of-range values share 405
    /// with type mismatches. Lifecycle and persistence failures are 101.
    /// Writes to keywords get their own 402.
    pub fn scorm12() -> Self {
        Self::new(
            [
                (ErrorKind::NotInitializedYet, "301"),
                (ErrorKind::AlreadyInitialized, "101"),
                (ErrorKind::AlreadyTerminated, "101"),
                (ErrorKind::UnknownElement, "201"),
                (ErrorKind::InvalidArgument, "201"),
                (ErrorKind::KeywordElement, "402"),
                (ErrorKind::ReadOnlyElement, "403"),
                (ErrorKind::WriteOnlyElement, "404"),
                (ErrorKind::TypeMismatch, "405"),
                (ErrorKind::RangeOutOfBounds, "405"),
                (ErrorKind::PersistenceFailure, "101"),
                (ErrorKind::GeneralException, "101"),
            ],
            [
                ("0", "No error"),
                ("101", "General exception"),
                ("201", "Invalid argument error"),
                ("202", "Element cannot have children"),
                ("203", "Element not an array - cannot have count"),
                ("301", "Not initialized"),
                ("401", "Not implemented error"),
                ("402", "Invalid set value, element is a keyword"),
                ("403", "Element is read only"),
                ("404", "Element is write only"),
                ("405", "Incorrect data type"),
            ],
        )
    }

    /// SCORM 2004 (4th edition) codes
    ///
    /// 2004 treats keywords as read-only, so both report 404.
    pub fn scorm2004() -> Self {
        Self::new(
            [
                (ErrorKind::NotInitializedYet, "122"),
                (ErrorKind::AlreadyInitialized, "103"),
                (ErrorKind::AlreadyTerminated, "104"),
                (ErrorKind::UnknownElement, "401"),
                (ErrorKind::InvalidArgument, "201"),
                (ErrorKind::KeywordElement, "404"),
                (ErrorKind::ReadOnlyElement, "404"),
                (ErrorKind::WriteOnlyElement, "405"),
                (ErrorKind::TypeMismatch, "406"),
                (ErrorKind::RangeOutOfBounds, "407"),
                (ErrorKind::PersistenceFailure, "391"),
                (ErrorKind::GeneralException, "101"),
            ],
            [
                ("0", "No Error"),
                ("101", "General Exception"),
                ("102", "General Initialization Failure"),
                ("103", "Already Initialized"),
                ("104", "Content Instance Terminated"),
                ("111", "General Termination Failure"),
                ("112", "Termination Before Initialization"),
                ("113", "Termination After Termination"),
                ("122", "Retrieve Data Before Initialization"),
                ("123", "Retrieve Data After Termination"),
                ("132", "Store Data Before Initialization"),
                ("133", "Store Data After Termination"),
                ("142", "Commit Before Initialization"),
                ("143", "Commit After Termination"),
                ("201", "General Argument Error"),
                ("301", "General Get Failure"),
                ("351", "General Set Failure"),
                ("391", "General Commit Failure"),
                ("401", "Undefined Data Model Element"),
                ("402", "Unimplemented Data Model Element"),
                ("403", "Data Model Element Value Not Initialized"),
                ("404", "Data Model Element Is Read Only"),
                ("405", "Data Model Element Is Write Only"),
                ("406", "Data Model Element Type Mismatch"),
                ("407", "Data Model Element Value Out Of Range"),
                ("408", "Data Model Dependency Not Established"),
            ],
        )
        .with_contextual(ErrorKind::NotInitializedYet, ApiCall::Terminate, false, "112")
        .with_contextual(ErrorKind::NotInitializedYet, ApiCall::Terminate, true, "113")
        .with_contextual(ErrorKind::NotInitializedYet, ApiCall::GetValue, true, "123")
        .with_contextual(ErrorKind::NotInitializedYet, ApiCall::SetValue, false, "132")
        .with_contextual(ErrorKind::NotInitializedYet, ApiCall::SetValue, true, "133")
        .with_contextual(ErrorKind::NotInitializedYet, ApiCall::Commit, false, "142")
        .with_contextual(ErrorKind::NotInitializedYet, ApiCall::Commit, true, "143")
        .with_contextual(ErrorKind::InvalidArgument, ApiCall::SetValue, false, "351")
    }

    /// Code for a kind, ignoring call context
    pub fn code(&self, kind: ErrorKind) -> &str {
        self.codes.get(&kind).map(String::as_str).unwrap_or("101")
    }

    /// Code for a kind raised by `call`; `terminated` tells whether the
    /// session already finished
    pub fn code_for(&self, kind: ErrorKind, call: ApiCall, terminated: bool) -> &str {
        self.contextual
            .get(&(kind, call, terminated))
            .map(String::as_str)
            .unwrap_or_else(|| self.code(kind))
    }

    /// Fixed description of a code, `None` when unknown
    pub fn description(&self, code: &str) -> Option<&str> {
        self.descriptions.get(code).map(String::as_str)
    }
}

impl Default for ErrorCodeTable {
    fn default() -> Self {
        Self::scorm12()
    }
}
