pub mod id;
pub mod registration;
pub mod stats;

pub use id::{ID_LEN, RegistrationId};
pub use registration::{
    Faculty, Gender, NewRegistration, Registration, RegistrationPatch, from_json,
};
pub use stats::{BatchStats, DashboardStats, FacultyCount, GenderDistribution, RecentRegistration};
