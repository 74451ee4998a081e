//! Shared test helpers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use regdesk_core::ServiceError;
use regdesk_sql::SqliteStore;

use crate::model::{Faculty, Gender, Registration, RegistrationId};
use crate::service::{RegistrationConfig, RegistrationService};
use crate::store::{RecordQuery, RecordStore, SqlRecordStore};

/// Fixed base time so ordering in tests never depends on the clock.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// A record created `minutes` after [`base_time`].
pub fn sample(
    id: &str,
    name: &str,
    faculty: Faculty,
    gender: Gender,
    minutes: i64,
) -> Registration {
    let created = base_time() + chrono::Duration::minutes(minutes);
    Registration {
        registration_id: RegistrationId::parse(id).unwrap(),
        name: name.to_string(),
        faculty,
        batch: "2023/24".to_string(),
        gender,
        dob: NaiveDate::from_ymd_opt(2001, 4, 9).unwrap(),
        phone: "+94 77 123 4567".to_string(),
        email: format!("{}@example.edu", id.to_ascii_lowercase()),
        created_at: created,
        updated_at: created,
    }
}

pub fn sql_store() -> SqlRecordStore {
    let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
    SqlRecordStore::new(sql).unwrap()
}

pub fn test_config() -> RegistrationConfig {
    RegistrationConfig {
        batch_cap: 10,
        store_timeout: Duration::from_secs(2),
        refresh_interval: Duration::from_millis(20),
    }
}

/// Service over a fresh in-memory store seeded with `records`.
pub fn service_with(records: &[Registration]) -> Arc<RegistrationService> {
    let store = sql_store();
    for r in records {
        store.insert(r).unwrap();
    }
    Arc::new(RegistrationService::new(Arc::new(store), test_config()))
}

/// A small mixed data set: 12 records over four faculties, newest last.
pub fn seed() -> Vec<Registration> {
    let faculties = [
        Faculty::Fisheries,
        Faculty::Agriculture,
        Faculty::Fisheries,
        Faculty::GraduateStudies,
        Faculty::VeterinaryMedicine,
    ];
    (0..12)
        .map(|i| {
            let gender = if i % 3 == 0 { Gender::Female } else { Gender::Male };
            sample(
                &format!("SEED{i:02}"),
                &format!("Student {i}"),
                faculties[i % faculties.len()],
                gender,
                i as i64,
            )
        })
        .collect()
}

/// Strings drawn on each page of a rendered PDF, in drawing order.
///
/// Text from the built-in fonts is WinAnsi encoded, which matches Latin-1
/// for everything the tests draw apart from the ellipsis at 0x85.
pub fn pdf_page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page| {
            let content = doc.get_page_content(page).unwrap();
            let content = lopdf::content::Content::decode(&content).unwrap();
            content
                .operations
                .iter()
                .flat_map(|op| match op.operator.as_str() {
                    "Tj" => op.operands.clone(),
                    "TJ" => op
                        .operands
                        .first()
                        .and_then(|o| o.as_array().ok())
                        .cloned()
                        .unwrap_or_default(),
                    _ => Vec::new(),
                })
                .filter_map(|o| o.as_str().ok().map(decode_win_ansi))
                .collect()
        })
        .collect()
}

fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b == 0x85 { '\u{2026}' } else { char::from(b) })
        .collect()
}

/// Store whose every call fails, standing in for an unreachable backend.
pub struct FailingStore;

impl FailingStore {
    fn err() -> ServiceError {
        ServiceError::Storage("connection refused".into())
    }
}

impl RecordStore for FailingStore {
    fn insert(&self, _record: &Registration) -> Result<(), ServiceError> {
        Err(Self::err())
    }

    fn get(&self, _id: &RegistrationId) -> Result<Option<Registration>, ServiceError> {
        Err(Self::err())
    }

    fn list(&self, _query: &RecordQuery) -> Result<Vec<Registration>, ServiceError> {
        Err(Self::err())
    }

    fn count(&self) -> Result<u64, ServiceError> {
        Err(Self::err())
    }

    fn update(&self, _record: &Registration) -> Result<(), ServiceError> {
        Err(Self::err())
    }
}

pub fn failing_service() -> Arc<RegistrationService> {
    Arc::new(RegistrationService::new(Arc::new(FailingStore), test_config()))
}
