//! Retry layer with exponential backoff.
//!
//! Adapter calls are synchronous, so waiting between attempts blocks the
//! calling thread. Keep the delays short for interactive content.

use scorm_rte_core::error::ScormError;
use scorm_rte_core::layer::{Layer, LayeredPersistence};
use scorm_rte_core::persistence::Persistence;
use scorm_rte_core::types::*;
use std::sync::Arc;
use std::time::Duration;

/// Retry layer configuration
#[derive(Debug, Clone)]
pub struct RetryLayer {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
}

impl RetryLayer {
    /// Create a new retry layer with default settings
    pub fn new() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
        }
    }

    /// Set maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set initial delay
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set maximum delay
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

impl Default for RetryLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Persistence> Layer<P> for RetryLayer {
    type LayeredPersistence = RetryPersistence<P>;

    fn layer(&self, inner: P) -> Self::LayeredPersistence {
        RetryPersistence {
            inner,
            config: self.clone(),
        }
    }
}

/// Persistence wrapped with retry logic
#[derive(Debug)]
pub struct RetryPersistence<P> {
    inner: P,
    config: RetryLayer,
}

impl<P: Persistence> RetryPersistence<P> {
    /// Execute with retry logic
    fn execute_with_retry<T, F>(&self, operation: &str, mut f: F) -> Result<T, ScormError>
    where
        F: FnMut() -> Result<T, ScormError>,
    {
        let mut attempt = 0;

        loop {
            match f() {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() || attempt >= self.config.max_retries {
                        return Err(e);
                    }

                    let delay = self.config.calculate_delay(attempt);
                    tracing::debug!(
                        "{} retry attempt {}/{} after {}, waiting {:?}",
                        operation,
                        attempt + 1,
                        self.config.max_retries,
                        e,
                        delay
                    );

                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

impl<P: Persistence> LayeredPersistence for RetryPersistence<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    fn layered_load(&self) -> Result<DataMap, ScormError> {
        self.execute_with_retry("load", || self.inner.load())
    }

    fn layered_save(&self, data: &DataMap) -> Result<(), ScormError> {
        self.execute_with_retry("save", || self.inner.save(data))
    }
}

impl<P: Persistence> Persistence for RetryPersistence<P> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls with the given error
    #[derive(Debug)]
    struct FlakyStore {
        failures: u32,
        calls: AtomicU32,
        retryable: bool,
    }

    impl FlakyStore {
        fn new(failures: u32, retryable: bool) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                retryable,
            }
        }

        fn attempt(&self) -> Result<(), ScormError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(if self.retryable {
                    ScormError::timeout("backend busy")
                } else {
                    ScormError::persistence("quota exceeded")
                });
            }
            Ok(())
        }
    }

    impl Persistence for FlakyStore {
        fn info(&self) -> Arc<PersistenceInfo> {
            PersistenceInfo::new("flaky", "Flaky store")
        }

        fn load(&self) -> Result<DataMap, ScormError> {
            self.attempt().map(|_| DataMap::new())
        }

        fn save(&self, _data: &DataMap) -> Result<(), ScormError> {
            self.attempt()
        }
    }

    fn fast_retry() -> RetryLayer {
        RetryLayer::new()
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2))
    }

    #[test]
    fn test_retries_transient_failures() {
        let layered = fast_retry().layer(FlakyStore::new(2, true));
        assert!(layered.save(&DataMap::new()).is_ok());
        assert_eq!(layered.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_gives_up_after_max_retries() {
        let layered = fast_retry()
            .with_max_retries(2)
            .layer(FlakyStore::new(10, true));
        let err = layered.load().unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(layered.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_does_not_retry_permanent_failures() {
        let layered = fast_retry().layer(FlakyStore::new(1, false));
        assert!(layered.save(&DataMap::new()).is_err());
        assert_eq!(layered.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_is_capped() {
        let layer = RetryLayer::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_backoff_multiplier(10.0)
            .with_max_delay(Duration::from_millis(500));
        assert_eq!(layer.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(layer.calculate_delay(3), Duration::from_millis(500));
    }
}
