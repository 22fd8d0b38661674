//! # SCORM RTE Core
//!
//! Core abstractions and runtime for the SCORM runtime API adapter.
//!
//! This crate provides the session state machine, the data model namespace
//! and error code tables, and the collaborator traits (persistence, layers,
//! observers, validation strategies) the adapter is composed from.

pub mod codes;
pub mod config;
pub mod datatype;
pub mod error;
pub mod layer;
pub mod namespace;
pub mod observer;
pub mod persistence;
pub mod runtime;
pub mod strategy;
pub mod types;

// Re-exports
pub use codes::{ErrorCodeTable, NO_ERROR};
pub use config::{AdapterConfig, LearnerInfo, ScormVersion, ValidationMode};
pub use datatype::DataType;
pub use error::{ErrorKind, Fault, ScormError};
pub use layer::{Layer, LayeredPersistence};
pub use namespace::{AccessMode, ElementDef, ElementRef, NamespaceTable};
pub use observer::{Observer, ObserverEngine, ObserverPhase};
pub use persistence::{AsyncPersistence, Persistence};
pub use runtime::{RuntimeAdapter, RuntimeAdapterBuilder};
pub use strategy::{
    select_validation_strategy, PermissiveValidation, StrictValidation, ValidationStrategy,
};
pub use types::*;

/// Result type alias for collaborator operations
pub type Result<T> = std::result::Result<T, ScormError>;
