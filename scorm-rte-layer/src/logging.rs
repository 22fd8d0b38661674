//! Logging layer for persistence operations.

use scorm_rte_core::error::ScormError;
use scorm_rte_core::layer::{Layer, LayeredPersistence};
use scorm_rte_core::persistence::Persistence;
use scorm_rte_core::types::*;
use std::sync::Arc;

/// Logging layer that logs persistence operations.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    prefix: String,
}

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self {
            prefix: "[SCORM RTE]".to_string(),
        }
    }

    /// Create a logging layer with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Persistence> Layer<P> for LoggingLayer {
    type LayeredPersistence = LoggingPersistence<P>;

    fn layer(&self, inner: P) -> Self::LayeredPersistence {
        LoggingPersistence {
            inner,
            prefix: self.prefix.clone(),
        }
    }
}

/// Persistence wrapped with logging
#[derive(Debug)]
pub struct LoggingPersistence<P> {
    inner: P,
    prefix: String,
}

impl<P: Persistence> LayeredPersistence for LoggingPersistence<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    fn layered_load(&self) -> Result<DataMap, ScormError> {
        let id = self.inner.info().id.clone();
        tracing::debug!("{} load request: persistence={}", self.prefix, id);

        let start = std::time::Instant::now();
        let result = self.inner.load();
        let elapsed = start.elapsed();

        match &result {
            Ok(data) => {
                tracing::debug!(
                    "{} load success: entries={}, elapsed={:?}",
                    self.prefix,
                    data.len(),
                    elapsed
                );
            }
            Err(e) => {
                tracing::error!("{} load error: {:?}, elapsed={:?}", self.prefix, e, elapsed);
            }
        }

        result
    }

    fn layered_save(&self, data: &DataMap) -> Result<(), ScormError> {
        tracing::debug!(
            "{} save request: persistence={}, entries={}",
            self.prefix,
            self.inner.info().id,
            data.len()
        );

        let start = std::time::Instant::now();
        let result = self.inner.save(data);
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => {
                tracing::debug!("{} save success, elapsed={:?}", self.prefix, elapsed);
            }
            Err(e) => {
                tracing::error!("{} save error: {:?}, elapsed={:?}", self.prefix, e, elapsed);
            }
        }

        result
    }
}

impl<P: Persistence> Persistence for LoggingPersistence<P> {
    fn info(&self) -> Arc<PersistenceInfo> {
        LayeredPersistence::layered_info(self)
    }

    fn load(&self) -> Result<DataMap, ScormError> {
        LayeredPersistence::layered_load(self)
    }

    fn save(&self, data: &DataMap) -> Result<(), ScormError> {
        LayeredPersistence::layered_save(self, data)
    }
}
