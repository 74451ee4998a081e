use tracing::info;

use regdesk_core::{ServiceError, next_timestamp};

use super::RegistrationService;
use crate::model::{Registration, RegistrationId, RegistrationPatch};

impl RegistrationService {
    /// Look up one record by operator-supplied ID (any case).
    pub fn get_registration(&self, id: &str) -> Result<Registration, ServiceError> {
        let id = RegistrationId::parse(id)?;
        self.store
            .get(&id)?
            .ok_or_else(|| ServiceError::NotFound(format!("registration '{id}' not found")))
    }

    /// Apply a partial update and return the merged record.
    ///
    /// The patch is validated before the store is touched. Identity and
    /// `created_at` are carried over from the stored record; `updated_at`
    /// always moves forward. Concurrent edits to one ID are last-write-wins.
    pub fn update_registration(
        &self,
        id: &str,
        patch: RegistrationPatch,
    ) -> Result<Registration, ServiceError> {
        let patch = patch.validated()?;
        let mut record = self.get_registration(id)?;

        patch.apply_to(&mut record);
        record.updated_at = next_timestamp(record.updated_at);

        self.store.update(&record)?;
        info!(id = %record.registration_id, "registration updated");
        Ok(record)
    }
}
