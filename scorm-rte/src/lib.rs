//! # SCORM RTE
//!
//! SCORM runtime API adapter for hosts that launch e-learning content.
//!
//! Content talks to the adapter through the eight SCORM calls
//! (`LMSInitialize`, `LMSGetValue`, `LMSSetValue`, `LMSCommit`, `LMSFinish`,
//! `LMSGetLastError`, `LMSGetErrorString`, `LMSGetDiagnostic`). The adapter
//! enforces the session lifecycle, validates element names and values against
//! the data model, keeps the last-error register and hands committed data to a
//! pluggable persistence collaborator.
//!
//! ## Features
//!
//! - **Explicit construction**: no global state, one adapter per session
//! - **Composable layers**: Stack persistence layers (logging, retry)
//! - **Observers**: Structured events instead of console logging
//! - **Configurable tables**: Element namespace and error codes are data
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! scorm-rte = { version = "0.1", features = ["stores", "layers"] }
//! ```
//!
//! ```ignore
//! use scorm_rte::prelude::*;
//! use std::sync::Arc;
//!
//! let store = ProgressLogStore::new("/var/lib/scorm/logs", "42", "7");
//! let mut api = RuntimeAdapter::builder(store)
//!     .layer(RetryLayer::new())
//!     .layer(LoggingLayer::new())
//!     .observer(Arc::new(TracingObserver::new()))
//!     .config(AdapterConfig::new().with_learner("42", "Doe, Jane"))
//!     .finish();
//!
//! assert_eq!(api.dispatch("LMSInitialize", &[""]), "true");
//! api.dispatch("LMSSetValue", &["cmi.core.lesson_status", "completed"]);
//! api.dispatch("LMSFinish", &[""]);
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: `stores`, `layers` and `observers`
//! - `stores`: Built-in persistence (memory, JSON file, progress log, async bridge)
//! - `layers`: Built-in persistence layers (logging, retry)
//! - `observers`: Built-in observers (tracing, recording)
//! - `schema`: `JsonSchema` derives for configuration types
//! - `full`: All features enabled

// Re-export core types and traits
pub use scorm_rte_core::*;

// Re-export stores under `store` module
#[cfg(feature = "scorm-rte-store")]
pub mod store {
    //! Persistence collaborator implementations.
    pub use scorm_rte_store::*;
}

// Re-export layers under `layers` module
#[cfg(feature = "scorm-rte-layer")]
pub mod layers {
    //! Built-in persistence layers.
    pub use scorm_rte_layer::*;
}

// Re-export observers under `observers` module
#[cfg(feature = "scorm-rte-observer")]
pub mod observers {
    //! Built-in observers.
    pub use scorm_rte_observer::*;
}

// Re-export schemars when schema feature is enabled
#[cfg(feature = "schema")]
pub mod schemars {
    pub use ::schemars::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use scorm_rte::prelude::*;
    //! ```

    pub use crate::{
        AdapterConfig, AdapterEvent, ApiCall, AsyncPersistence, DataMap, ErrorKind, Layer,
        Observer, Persistence, Result, RuntimeAdapter, ScormError, ScormVersion, SessionState,
        ValidationMode,
    };

    #[cfg(feature = "scorm-rte-store")]
    pub use crate::store::*;

    #[cfg(feature = "scorm-rte-layer")]
    pub use crate::layers::*;

    #[cfg(feature = "scorm-rte-observer")]
    pub use crate::observers::*;
}
