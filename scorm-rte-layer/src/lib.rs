//! # SCORM RTE Layers
//!
//! Built-in persistence layers for the runtime adapter.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs every load and save with timing information
//! - `RetryLayer`: Automatic retry with exponential backoff for retryable errors
//!
//! ## Usage
//!
//! ```ignore
//! use scorm_rte_core::RuntimeAdapter;
//! use scorm_rte_layer::{LoggingLayer, RetryLayer};
//!
//! let adapter = RuntimeAdapter::builder(store)
//!     .layer(RetryLayer::new().with_max_retries(3))
//!     .layer(LoggingLayer::new())
//!     .finish();
//! ```

pub mod logging;
pub mod retry;

// Re-exports
pub use logging::{LoggingLayer, LoggingPersistence};
pub use retry::{RetryLayer, RetryPersistence};
