use tracing::debug;

use regdesk_core::ServiceError;

use super::RegistrationService;
use crate::model::{
    BatchStats, DashboardStats, FacultyCount, RecentRegistration, Registration,
};
use crate::store::RecordQuery;

/// Summarize one batch of records.
///
/// Pure: counts come from `batch` alone. An empty batch gives zero counts
/// and an empty recent list.
pub fn aggregate(batch: &[Registration]) -> BatchStats {
    let mut stats = BatchStats {
        total_registrations: batch.len(),
        ..Default::default()
    };

    for record in batch {
        stats.gender_distribution.record(record.gender);

        // At most seven faculties, so a linear scan keeps first-seen order
        // without a second index.
        match stats
            .faculty_distribution
            .iter_mut()
            .find(|fc| fc.faculty == record.faculty)
        {
            Some(fc) => fc.count += 1,
            None => stats.faculty_distribution.push(FacultyCount {
                faculty: record.faculty,
                count: 1,
                percent: 0.0,
            }),
        }

        stats.recent_registrations.push(RecentRegistration::from(record));
    }

    let mut faculties = std::mem::take(&mut stats.faculty_distribution);
    for fc in &mut faculties {
        fc.percent = stats.share(fc.count);
    }
    stats.faculty_distribution = faculties;
    stats
}

impl RegistrationService {
    /// Dashboard statistics over the `batch_cap` most recent records, plus
    /// the number of stored records.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let batch = self.store.list(&RecordQuery::recent(self.config.batch_cap))?;
        let stored = self.store.count()?;
        debug!(batch = batch.len(), stored, "computed dashboard stats");
        Ok(DashboardStats {
            batch: aggregate(&batch),
            stored_registrations: stored,
        })
    }
}
