//! Operator login: verifies the password against the argon2id hash and
//! issues a JWT.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use regdesk_core::{ServiceError, new_id};

use crate::auth_middleware::Claims;
use crate::bootstrap::verify_operator_password;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login_handler))
}

async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let config = &state.server_config;

    // Same answer for a wrong username as for a wrong password.
    if body.username != config.operator.username
        || !verify_operator_password(&body.password, &config.operator.password_hash)
    {
        warn!(username = %body.username, "rejected login");
        return Err(ServiceError::Unauthorized("invalid credentials".into()));
    }

    let now = chrono::Utc::now().timestamp();
    let expire_secs = config.jwt.expire_secs;
    let claims = Claims {
        sub: body.username,
        sid: new_id(),
        iat: now,
        exp: now + expire_secs as i64,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt.secret.as_bytes());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| ServiceError::Internal(format!("failed to encode JWT: {e}")))?;

    info!(sub = %claims.sub, "operator logged in");
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: expire_secs,
    }))
}
