use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Faculty, Gender, Registration, RegistrationId};

/// Count of one faculty within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultyCount {
    pub faculty: Faculty,
    pub count: usize,
    /// `count` as a percentage of the batch.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderDistribution {
    pub male: usize,
    pub female: usize,
}

impl GenderDistribution {
    pub(crate) fn record(&mut self, gender: Gender) {
        match gender {
            Gender::Male => self.male += 1,
            Gender::Female => self.female += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.male + self.female
    }
}

/// Dashboard projection of a record. Contact details and date of birth
/// are left out on purpose: this list is shown on a shared screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRegistration {
    pub registration_id: RegistrationId,
    pub name: String,
    pub faculty: Faculty,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
}

impl From<&Registration> for RecentRegistration {
    fn from(r: &Registration) -> Self {
        Self {
            registration_id: r.registration_id.clone(),
            name: r.name.clone(),
            faculty: r.faculty,
            gender: r.gender,
            created_at: r.created_at,
        }
    }
}

/// Aggregate over one capped batch of the most recent records.
///
/// `total_registrations` counts the batch, not the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub total_registrations: usize,
    /// First-seen order. Sorting is up to the presenter.
    pub faculty_distribution: Vec<FacultyCount>,
    pub gender_distribution: GenderDistribution,
    pub recent_registrations: Vec<RecentRegistration>,
}

impl BatchStats {
    /// Percentage of the batch that `count` represents. An empty batch is
    /// 0.0 rather than NaN.
    pub fn share(&self, count: usize) -> f64 {
        if self.total_registrations == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total_registrations as f64
        }
    }
}

/// Payload of the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(flatten)]
    pub batch: BatchStats,
    /// Number of rows in the store, from a separate count query.
    pub stored_registrations: u64,
}
