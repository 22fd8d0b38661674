//! # SCORM RTE Stores
//!
//! Persistence collaborators for the runtime adapter.
//!
//! Currently implemented stores:
//! - `MemoryStore`: In-process map with a shareable handle
//! - `JsonFileStore`: One JSON document per attempt, written atomically
//! - `ProgressLogStore`: Append-only `progress.json` log per learner and attempt
//! - `BlockingStore`: Bridges an `AsyncPersistence` backend with a bounded wait
//!
//! ## Usage
//!
//! ```ignore
//! use scorm_rte_core::RuntimeAdapter;
//! use scorm_rte_store::ProgressLogStore;
//!
//! let store = ProgressLogStore::new("/var/lib/scorm/logs", "42", "7");
//! let mut adapter = RuntimeAdapter::builder(store).finish();
//! ```

pub mod blocking;
pub mod json_file;
pub mod memory;
pub mod progress_log;

// Re-exports
pub use blocking::BlockingStore;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use progress_log::{ElementUpdate, LogEntry, ProgressLogStore};
