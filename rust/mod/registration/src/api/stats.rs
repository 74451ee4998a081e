use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};

use regdesk_core::ServiceError;

use super::AppState;
use crate::model::DashboardStats;
use crate::refresh::{RefreshState, StatsRefresher};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/stats/stream", get(stream_stats))
}

async fn get_stats(State(svc): State<AppState>) -> Result<Json<DashboardStats>, ServiceError> {
    let stats = svc.run("dashboard stats", |s| s.dashboard_stats()).await?;
    Ok(Json(stats))
}

/// One refresher per connection; it is dropped with the stream when the
/// client goes away.
async fn stream_stats(
    State(svc): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let interval = svc.config().refresh_interval;
    let refresher = StatsRefresher::spawn(svc, interval);

    let events = stream::unfold(refresher, |mut refresher| async move {
        let state = refresher.changed().await?;
        Some((Ok(to_event(state)), refresher))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_event(state: RefreshState) -> Event {
    match state {
        RefreshState::Ready(stats) => match Event::default().event("stats").json_data(&*stats) {
            Ok(event) => event,
            Err(e) => Event::default()
                .event("error")
                .data(format!("failed to encode stats: {e}")),
        },
        RefreshState::Failed(message) => Event::default().event("error").data(message),
        RefreshState::Pending => Event::default().comment("pending"),
    }
}
