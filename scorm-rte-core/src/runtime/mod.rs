//! Runtime layer.
//!
//! This module provides the adapter that content talks to. It sits between
//! the SCORM API surface (string in, string out) and the collaborators:
//! - Enforcing the session lifecycle
//! - Validating element access through the configured strategy
//! - Maintaining the error register
//! - Delegating load/save to the (layered) persistence
//! - Emitting structured events to observers

pub mod adapter;

pub use adapter::{RuntimeAdapter, RuntimeAdapterBuilder};
