use axum::{
    Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use regdesk_core::ServiceError;

use super::{AppState, FacultyFilter};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/export/csv", get(export_csv))
        .route("/export/pdf", get(export_pdf))
}

async fn export_csv(
    State(svc): State<AppState>,
    Query(filter): Query<FacultyFilter>,
) -> Result<Response, ServiceError> {
    let faculty = filter.parse()?;
    let body = svc.run("csv export", move |s| s.export_csv(faculty)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=registrations.csv"),
        ],
        body,
    )
        .into_response())
}

async fn export_pdf(
    State(svc): State<AppState>,
    Query(filter): Query<FacultyFilter>,
) -> Result<Response, ServiceError> {
    let faculty = filter.parse()?;
    let body = svc.run("pdf export", move |s| s.export_pdf(faculty)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=registrations.pdf"),
        ],
        body,
    )
        .into_response())
}
