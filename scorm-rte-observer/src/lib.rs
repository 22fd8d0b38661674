//! # SCORM RTE Observers
//!
//! Built-in observers for the runtime adapter.
//!
//! - `TracingObserver`: Forwards adapter events to `tracing`
//! - `RecordingObserver`: Keeps every event in memory for hosts and tests

pub mod recording;
pub mod tracing_observer;

// Re-exports
pub use recording::{RecordedEvent, RecordingObserver};
pub use tracing_observer::TracingObserver;
