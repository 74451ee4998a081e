//! Record store seam.
//!
//! Everything above this module talks to registrations through
//! [`RecordStore`]; [`SqlRecordStore`] is the embedded implementation.

pub mod schema;
pub mod sql;

pub use sql::SqlRecordStore;

use regdesk_core::ServiceError;

use crate::model::{Faculty, Registration, RegistrationId};

/// Selection for [`RecordStore::list`]. Results are always ordered by
/// creation time, newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Exact-match faculty filter.
    pub faculty: Option<Faculty>,
    /// Row cap; `None` returns every match.
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// The `limit` most recent records across all faculties.
    pub fn recent(limit: usize) -> Self {
        Self {
            faculty: None,
            limit: Some(limit),
        }
    }

    /// Every record, optionally restricted to one faculty.
    pub fn all(faculty: Option<Faculty>) -> Self {
        Self {
            faculty,
            limit: None,
        }
    }
}

/// Persistence for registration rows.
///
/// Calls are synchronous and may block on I/O; async callers go through
/// `RegistrationService::run`, which moves them to the blocking pool and
/// bounds them with a timeout.
pub trait RecordStore: Send + Sync {
    /// Insert a new record. `Conflict` if the ID is taken.
    fn insert(&self, record: &Registration) -> Result<(), ServiceError>;

    /// Point lookup. `Ok(None)` when no record has this ID.
    fn get(&self, id: &RegistrationId) -> Result<Option<Registration>, ServiceError>;

    /// Records matching `query`, newest first.
    fn list(&self, query: &RecordQuery) -> Result<Vec<Registration>, ServiceError>;

    /// Number of stored records.
    fn count(&self) -> Result<u64, ServiceError>;

    /// Overwrite the stored record with the same ID. `NotFound` if there
    /// is none; the store is left untouched in that case.
    fn update(&self, record: &Registration) -> Result<(), ServiceError>;
}
