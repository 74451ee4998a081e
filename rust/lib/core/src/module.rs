use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The server binary merges every module's router into one. Each module
/// prefixes its own paths (`/registration/v1/...`).
pub trait Module: Send + Sync {
    /// Module name, used in startup logs.
    fn name(&self) -> &str;

    /// Return the module's routes. State is already applied.
    fn routes(&self) -> Router;
}
