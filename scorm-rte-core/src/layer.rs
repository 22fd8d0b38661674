//! Layer trait and abstractions.
//!
//! Layers wrap a persistence collaborator with cross-cutting concerns such as
//! logging or retry, producing a new persistence the adapter can own.

use crate::error::ScormError;
use crate::persistence::Persistence;
use crate::types::*;
use std::sync::Arc;

/// Layer trait for wrapping persistence collaborators.
///
/// Each layer wraps an inner persistence and returns a new persistence with
/// enhanced behaviour.
pub trait Layer<P: Persistence> {
    /// The type of the layered persistence
    type LayeredPersistence: Persistence;

    /// Wrap the inner persistence with this layer
    fn layer(&self, inner: P) -> Self::LayeredPersistence;
}

/// Helper trait for layered persistence.
///
/// Provides forwarding implementations; implementers only override the
/// methods they want to intercept.
pub trait LayeredPersistence: Sized + Persistence {
    /// The inner persistence type
    type Inner: Persistence;

    /// Get a reference to the inner persistence
    fn inner(&self) -> &Self::Inner;

    /// Default implementation for info - forwards to inner
    fn layered_info(&self) -> Arc<PersistenceInfo> {
        self.inner().info()
    }

    /// Default implementation for load - forwards to inner
    fn layered_load(&self) -> Result<DataMap, ScormError> {
        self.inner().load()
    }

    /// Default implementation for save - forwards to inner
    fn layered_save(&self, data: &DataMap) -> Result<(), ScormError> {
        self.inner().save(data)
    }
}

/// Macro to implement Persistence by forwarding to LayeredPersistence methods.
#[macro_export]
macro_rules! impl_layered_persistence {
    ($type:ty) => {
        impl $crate::persistence::Persistence for $type {
            fn info(&self) -> std::sync::Arc<$crate::types::PersistenceInfo> {
                $crate::layer::LayeredPersistence::layered_info(self)
            }

            fn load(&self) -> Result<$crate::types::DataMap, $crate::error::ScormError> {
                $crate::layer::LayeredPersistence::layered_load(self)
            }

            fn save(
                &self,
                data: &$crate::types::DataMap,
            ) -> Result<(), $crate::error::ScormError> {
                $crate::layer::LayeredPersistence::layered_save(self, data)
            }
        }
    };
}
