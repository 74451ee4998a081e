use tracing::{info, warn};

use regdesk_core::{ServiceError, now_utc};

use super::RegistrationService;
use crate::model::{NewRegistration, Registration, RegistrationId};

/// Fresh IDs to try before giving up on a run of collisions.
const MAX_ID_ATTEMPTS: usize = 8;

impl RegistrationService {
    /// Register a student and return the stored record.
    pub fn register(&self, form: NewRegistration) -> Result<Registration, ServiceError> {
        let form = form.validated()?;
        let now = now_utc();

        let mut record = Registration {
            registration_id: RegistrationId::generate(),
            name: form.name,
            faculty: form.faculty,
            batch: form.batch,
            gender: form.gender,
            dob: form.dob,
            phone: form.phone,
            email: form.email,
            created_at: now,
            updated_at: now,
        };

        for attempt in 1..=MAX_ID_ATTEMPTS {
            match self.store.insert(&record) {
                Ok(()) => {
                    info!(
                        id = %record.registration_id,
                        faculty = %record.faculty,
                        "student registered"
                    );
                    return Ok(record);
                }
                Err(ServiceError::Conflict(_)) => {
                    warn!(id = %record.registration_id, attempt, "registration id collision");
                    record.registration_id = RegistrationId::generate();
                }
                Err(e) => return Err(e),
            }
        }

        Err(ServiceError::Conflict(format!(
            "could not allocate a free registration id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::fixtures::{service_with, test_config};
    use crate::model::{Faculty, Gender};
    use crate::store::{RecordQuery, RecordStore};

    fn form() -> NewRegistration {
        NewRegistration {
            name: "  Ada Lovelace ".into(),
            faculty: Faculty::EngineeringAndBioresource,
            batch: " 2024 ".into(),
            gender: Gender::Female,
            dob: NaiveDate::from_ymd_opt(2002, 12, 10).unwrap(),
            phone: "0771234567".into(),
            email: "ada@example.edu".into(),
        }
    }

    #[test]
    fn register_assigns_id_and_timestamps() {
        let svc = service_with(&[]);
        let record = svc.register(form()).unwrap();

        assert_eq!(record.registration_id.as_str().len(), 6);
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.batch, "2024");
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(svc.get_registration(record.registration_id.as_str()).unwrap(), record);
    }

    #[test]
    fn register_rejects_missing_phone() {
        let svc = service_with(&[]);
        let mut f = form();
        f.phone = String::new();
        let err = svc.register(f).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(svc.store.count().unwrap(), 0);
    }

    /// Rejects the first `collisions` inserts as duplicates.
    struct CollidingStore {
        inner: crate::store::SqlRecordStore,
        collisions: Mutex<usize>,
    }

    impl RecordStore for CollidingStore {
        fn insert(&self, record: &Registration) -> Result<(), ServiceError> {
            let mut left = self.collisions.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(ServiceError::Conflict("duplicate".into()));
            }
            self.inner.insert(record)
        }
        fn get(&self, id: &RegistrationId) -> Result<Option<Registration>, ServiceError> {
            self.inner.get(id)
        }
        fn list(&self, query: &RecordQuery) -> Result<Vec<Registration>, ServiceError> {
            self.inner.list(query)
        }
        fn count(&self) -> Result<u64, ServiceError> {
            self.inner.count()
        }
        fn update(&self, record: &Registration) -> Result<(), ServiceError> {
            self.inner.update(record)
        }
    }

    fn colliding_service(collisions: usize) -> RegistrationService {
        let store = CollidingStore {
            inner: crate::fixtures::sql_store(),
            collisions: Mutex::new(collisions),
        };
        RegistrationService::new(Arc::new(store), test_config())
    }

    #[test]
    fn register_retries_on_collision() {
        let svc = colliding_service(3);
        let record = svc.register(form()).unwrap();
        assert_eq!(svc.store.count().unwrap(), 1);
        assert!(svc.store.get(&record.registration_id).unwrap().is_some());
    }

    #[test]
    fn register_gives_up_after_max_attempts() {
        let svc = colliding_service(MAX_ID_ATTEMPTS);
        let err = svc.register(form()).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(svc.store.count().unwrap(), 0);
    }
}
