use crate::infra::{AppState, SuggestionBackend};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use gymdesk::advisor::{advisor_router, AdvisorState};
use gymdesk::scheduling::{scheduling_router, InMemoryEntityStore, SchedulingState};
use serde_json::json;

pub(crate) fn with_scheduling_routes(
    scheduling: SchedulingState<InMemoryEntityStore>,
    advisor: AdvisorState<InMemoryEntityStore, SuggestionBackend>,
) -> axum::Router {
    scheduling_router(scheduling)
        .merge(advisor_router(advisor))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
