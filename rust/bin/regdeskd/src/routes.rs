//! Route registration: module routes plus system endpoints, behind the JWT
//! middleware.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::auth_middleware::{self, JwtState};
use crate::config::ServerConfig;
use crate::login;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub jwt_state: Arc<JwtState>,
    pub server_config: Arc<ServerConfig>,
}

/// Build the complete router. Module routers already carry their own
/// `/<prefix>/v1` paths and state.
pub fn build_router(state: AppState, module_routes: Vec<(&str, Router)>) -> Router {
    let jwt_state = state.jwt_state.clone();

    let mut app: Router = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .merge(login::routes())
        .with_state(state);

    for (name, router) in module_routes {
        tracing::info!("mounting module {name}");
        app = app.merge(router);
    }

    app.layer(middleware::from_fn_with_state(
        jwt_state,
        auth_middleware::auth_middleware,
    ))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "regdeskd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use regdesk_core::Module;
    use regdesk_sql::SqliteStore;
    use registration::RegistrationModule;
    use registration::service::RegistrationService;
    use registration::store::SqlRecordStore;

    use super::*;
    use crate::bootstrap::tests::config;

    fn app() -> Router {
        let server_config = config("hunter2");
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let store = SqlRecordStore::new(sql).unwrap();
        let module = RegistrationModule::new(RegistrationService::new(
            Arc::new(store),
            server_config.registration(),
        ));

        let state = AppState {
            jwt_state: Arc::new(JwtState::from_secret(&server_config.jwt.secret)),
            server_config: Arc::new(server_config),
        };
        build_router(state, vec![(module.name(), module.routes())])
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {t}"));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_string(&v).unwrap())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::json!(null));
        (status, json)
    }

    async fn login(app: &Router, password: &str) -> (StatusCode, serde_json::Value) {
        call(
            app,
            "POST",
            "/auth/login",
            None,
            Some(serde_json::json!({"username": "operator", "password": password})),
        )
        .await
    }

    #[tokio::test]
    async fn health_and_version_are_public() {
        let app = app();
        let (status, json) = call(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        let (status, json) = call(&app, "GET", "/version", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "regdeskd");
    }

    #[tokio::test]
    async fn module_routes_require_a_token() {
        let app = app();
        let (status, json) = call(&app, "GET", "/registration/v1/stats", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHENTICATED");

        let (status, _) = call(&app, "GET", "/registration/v1/stats", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (status, json) = login(&app(), "wrong").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "invalid credentials");
    }

    #[tokio::test]
    async fn login_token_opens_module_routes() {
        let app = app();
        let (status, json) = login(&app, "hunter2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["token_type"], "Bearer");
        let token = json["access_token"].as_str().unwrap().to_string();

        let (status, json) = call(&app, "GET", "/registration/v1/stats", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["storedRegistrations"], 0);
    }

    #[tokio::test]
    async fn token_from_another_secret_is_rejected() {
        let app = app();
        let claims = crate::auth_middleware::Claims {
            sub: "operator".into(),
            sid: "x".into(),
            iat: chrono::Utc::now().timestamp(),
            exp: chrono::Utc::now().timestamp() + 600,
        };
        let forged = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(b"not-the-secret"),
        )
        .unwrap();
        let (status, _) = call(&app, "GET", "/registration/v1/stats", Some(&forged), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
