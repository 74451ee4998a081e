pub mod api;
pub mod model;
pub mod refresh;
pub mod report;
pub mod service;
pub mod store;

#[cfg(test)]
mod fixtures;

use std::sync::Arc;

use axum::Router;
use regdesk_core::Module;

use service::RegistrationService;

/// Registration module: student records, dashboard statistics and exports.
pub struct RegistrationModule {
    service: Arc<RegistrationService>,
}

impl RegistrationModule {
    pub fn new(service: RegistrationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl Module for RegistrationModule {
    fn name(&self) -> &str {
        "registration"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
