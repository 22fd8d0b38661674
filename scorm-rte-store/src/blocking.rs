//! Bridge from asynchronous backends to the synchronous persistence contract.
//!
//! SCORM calls return synchronously, so an async backend is driven to
//! completion on a private current-thread runtime and abandoned once the
//! timeout expires.

use scorm_rte_core::config::AdapterConfig;
use scorm_rte_core::error::ScormError;
use scorm_rte_core::persistence::{AsyncPersistence, Persistence};
use scorm_rte_core::types::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Blocks on an [`AsyncPersistence`] for at most `timeout` per operation.
///
/// Must not be called from inside another tokio runtime; hosts running one
/// should call the adapter from `spawn_blocking`.
#[derive(Debug)]
pub struct BlockingStore<A> {
    inner: A,
    runtime: tokio::runtime::Runtime,
    timeout: Duration,
}

impl<A: AsyncPersistence> BlockingStore<A> {
    pub fn new(inner: A, timeout: Duration) -> Result<Self, ScormError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            inner,
            runtime,
            timeout,
        })
    }

    /// Use the adapter's `commit_timeout_ms` as the per-operation bound
    pub fn from_config(inner: A, config: &AdapterConfig) -> Result<Self, ScormError> {
        Self::new(inner, config.commit_timeout())
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn block<T, F>(&self, operation: &str, future: F) -> Result<T, ScormError>
    where
        F: Future<Output = Result<T, ScormError>>,
    {
        match self
            .runtime
            .block_on(async { tokio::time::timeout(self.timeout, future).await })
        {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "{} {} timed out after {:?}",
                    self.inner.info().id,
                    operation,
                    self.timeout
                );
                Err(ScormError::timeout(format!(
                    "{} did not finish within {:?}",
                    operation, self.timeout
                )))
            }
        }
    }
}

impl<A: AsyncPersistence> Persistence for BlockingStore<A> {
    fn info(&self) -> Arc<PersistenceInfo> {
        self.inner.info()
    }

    fn load(&self) -> Result<DataMap, ScormError> {
        self.block("load", self.inner.load())
    }

    fn save(&self, data: &DataMap) -> Result<(), ScormError> {
        self.block("save", self.inner.save(data))
    }
}
