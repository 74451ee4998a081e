pub mod export;
pub mod registrations;
pub mod stats;


use std::sync::Arc;

use axum::Router;
use serde::Deserialize;

use regdesk_core::ServiceError;

use crate::model::Faculty;
use crate::service::RegistrationService;

/// Shared application state.
pub type AppState = Arc<RegistrationService>;

/// Build the registration API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/registration/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(stats::routes())
        .merge(export::routes())
        .merge(registrations::routes())
}

/// `?faculty=` filter shared by the export endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FacultyFilter {
    pub faculty: Option<String>,
}

impl FacultyFilter {
    /// Absent or blank means no filter; anything else must name a faculty.
    pub fn parse(&self) -> Result<Option<Faculty>, ServiceError> {
        match self.faculty.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }
}
