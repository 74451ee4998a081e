pub mod editor;
pub mod enroll;
pub mod export;
pub mod stats;

pub use stats::aggregate;

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use regdesk_core::ServiceError;

use crate::store::RecordStore;

/// Tunables for the registration service.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// How many of the most recent records the dashboard aggregates.
    pub batch_cap: usize,
    /// Upper bound on one record-store call.
    pub store_timeout: Duration,
    /// Period of the dashboard stats refresher.
    pub refresh_interval: Duration,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            batch_cap: 10,
            store_timeout: Duration::from_secs(5),
            refresh_interval: Duration::from_secs(30),
        }
    }
}

/// Registration service: the record store plus the business rules on top.
///
/// Methods are synchronous and stateless; each one is an independent round
/// trip to the store.
pub struct RegistrationService {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) config: RegistrationConfig,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RecordStore>, config: RegistrationConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Run a blocking service call off the async runtime, bounded by
    /// `store_timeout`. A timeout is reported as a storage failure; the
    /// blocking call itself is left to finish and its result dropped.
    pub async fn run<T, F>(self: &Arc<Self>, op: &'static str, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&RegistrationService) -> Result<T, ServiceError> + Send + 'static,
    {
        let svc = Arc::clone(self);
        let timeout = self.config.store_timeout;
        let task = tokio::task::spawn_blocking(move || f(&svc));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ServiceError::Internal(format!("{op} panicked: {join_err}"))),
            Err(_) => {
                warn!("{op} timed out after {timeout:?}");
                Err(ServiceError::Storage(format!("{op} timed out after {timeout:?}")))
            }
        }
    }
}
