use tracing::info;

use regdesk_core::{ServiceError, now_utc};

use super::RegistrationService;
use crate::model::{Faculty, Registration};
use crate::report;
use crate::store::RecordQuery;

impl RegistrationService {
    /// Every stored record, optionally restricted to one faculty, newest
    /// first. Not capped by the dashboard batch size.
    pub fn export_records(
        &self,
        faculty: Option<Faculty>,
    ) -> Result<Vec<Registration>, ServiceError> {
        self.store.list(&RecordQuery::all(faculty))
    }

    pub fn export_csv(&self, faculty: Option<Faculty>) -> Result<String, ServiceError> {
        let records = self.export_records(faculty)?;
        info!(rows = records.len(), faculty = ?faculty, "csv export");
        Ok(report::render_csv(&records))
    }

    pub fn export_pdf(&self, faculty: Option<Faculty>) -> Result<Vec<u8>, ServiceError> {
        let records = self.export_records(faculty)?;
        info!(rows = records.len(), faculty = ?faculty, "pdf export");
        report::render_pdf(&records, faculty, now_utc())
    }
}
