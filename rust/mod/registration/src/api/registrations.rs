use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use regdesk_core::ServiceError;

use super::AppState;
use crate::model::{NewRegistration, Registration, RegistrationPatch, from_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/registrations", post(create_registration))
        .route("/registrations/{id}", get(get_registration).put(update_registration))
}

async fn get_registration(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Registration>, ServiceError> {
    let record = svc.run("get registration", move |s| s.get_registration(&id)).await?;
    Ok(Json(record))
}

// Bodies arrive as raw JSON so enum and date errors surface as
// VALIDATION_FAILED instead of the extractor's own rejection.
async fn update_registration(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Registration>, ServiceError> {
    let patch: RegistrationPatch = from_json(body)?;
    let record = svc
        .run("update registration", move |s| s.update_registration(&id, patch))
        .await?;
    Ok(Json(record))
}

async fn create_registration(
    State(svc): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Registration>), ServiceError> {
    let form: NewRegistration = from_json(body)?;
    let record = svc.run("register", move |s| s.register(form)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
