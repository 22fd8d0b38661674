//! Persistence collaborator traits.

use crate::error::ScormError;
use crate::types::*;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Durable storage for the data model store.
///
/// The adapter calls [`load`](Persistence::load) from `Initialize` and
/// [`save`](Persistence::save) from `Commit`; it never performs I/O itself.
pub trait Persistence: Send + Sync + Debug + 'static {
    /// Get persistence information
    fn info(&self) -> Arc<PersistenceInfo>;

    /// Load previously saved values
    fn load(&self) -> Result<DataMap, ScormError>;

    /// Save the complete store
    fn save(&self, data: &DataMap) -> Result<(), ScormError>;
}

/// Asynchronous storage backend.
///
/// Adapter calls are synchronous, so async backends are bridged through a
/// blocking wrapper with a bounded timeout before being handed to the
/// adapter.
#[async_trait]
pub trait AsyncPersistence: Send + Sync + Debug + 'static {
    /// Get persistence information
    fn info(&self) -> Arc<PersistenceInfo>;

    /// Load previously saved values
    async fn load(&self) -> Result<DataMap, ScormError>;

    /// Save the complete store
    async fn save(&self, data: &DataMap) -> Result<(), ScormError>;
}

impl Persistence for Box<dyn Persistence> {
    fn info(&self) -> Arc<PersistenceInfo> {
        (**self).info()
    }

    fn load(&self) -> Result<DataMap, ScormError> {
        (**self).load()
    }

    fn save(&self, data: &DataMap) -> Result<(), ScormError> {
        (**self).save(data)
    }
}
