use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use super::approval::ApprovalService;
use super::availability::AvailabilityEngine;
use super::booking::{BookingError, BookingService};
use super::directory::ScheduleDirectory;
use super::domain::{Actor, AppointmentDraft, AppointmentId, MemberId, Role, TrainerId, VenueId};
use super::store::{EntityStore, StoreError};

/// Scheduling services shared by the HTTP handlers.
pub struct SchedulingState<S> {
    pub booking: Arc<BookingService<S>>,
    pub approvals: Arc<ApprovalService<S>>,
    pub availability: Arc<AvailabilityEngine<S>>,
    pub directory: Arc<ScheduleDirectory<S>>,
}

impl<S: EntityStore> SchedulingState<S> {
    pub fn new(store: Arc<S>) -> Self {
        let availability = Arc::new(AvailabilityEngine::new(store.clone()));
        Self {
            booking: Arc::new(BookingService::new(store.clone())),
            approvals: Arc::new(ApprovalService::new(store.clone())),
            availability: availability.clone(),
            directory: Arc::new(ScheduleDirectory::new(store, availability)),
        }
    }
}

impl<S> Clone for SchedulingState<S> {
    fn clone(&self) -> Self {
        Self {
            booking: self.booking.clone(),
            approvals: self.approvals.clone(),
            availability: self.availability.clone(),
            directory: self.directory.clone(),
        }
    }
}

/// Actor identity extracted from the headers the upstream identity provider
/// sets. The core trusts these values; there is no re-authentication here.
pub struct CurrentActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let member_id = parts
            .headers
            .get("x-actor-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok());

        let Some(member_id) = member_id else {
            let payload = json!({ "error": "missing or invalid x-actor-id header" });
            return Err((StatusCode::UNAUTHORIZED, Json(payload)).into_response());
        };

        // Unknown or absent roles fall back to the least-privileged one.
        let role = parts
            .headers
            .get("x-actor-role")
            .and_then(|value| value.to_str().ok())
            .and_then(Role::from_label)
            .unwrap_or(Role::Member);

        Ok(CurrentActor(Actor {
            member_id: MemberId(member_id),
            role,
        }))
    }
}

/// Router builder exposing the scheduling endpoints.
pub fn scheduling_router<S: EntityStore + 'static>(state: SchedulingState<S>) -> Router {
    Router::new()
        .route(
            "/api/v1/appointments",
            post(create_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/v1/appointments/pending", get(pending_handler::<S>))
        .route(
            "/api/v1/appointments/:id",
            put(update_handler::<S>).delete(delete_handler::<S>),
        )
        .route("/api/v1/appointments/:id/approve", post(approve_handler::<S>))
        .route("/api/v1/appointments/:id/revoke", post(revoke_handler::<S>))
        .route(
            "/api/v1/trainers/available",
            get(available_trainers_handler::<S>),
        )
        .route(
            "/api/v1/options/by-trainer/:id",
            get(options_by_trainer_handler::<S>),
        )
        .route(
            "/api/v1/options/by-venue/:id",
            get(options_by_venue_handler::<S>),
        )
        .with_state(state)
}

fn parse_date(raw: &str) -> Result<NaiveDate, Response> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        bad_request(format!(
            "'{raw}' is not a valid date; expected YYYY-MM-DD"
        ))
    })
}

fn parse_time(raw: &str) -> Result<NaiveTime, Response> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| bad_request(format!("'{raw}' is not a valid time; expected HH:MM")))
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn forbidden(message: &str) -> Response {
    (StatusCode::FORBIDDEN, Json(json!({ "error": message }))).into_response()
}

fn store_failure(err: StoreError) -> Response {
    tracing::error!(error = %err, "entity store failure");
    let payload = json!({ "error": "internal error" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

fn booking_failure(err: BookingError) -> Response {
    match err {
        BookingError::Rejected(report) => {
            let payload = json!({ "violations": report.messages() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        BookingError::AccessDenied(reason) => forbidden(reason),
        BookingError::NotFound => {
            let payload = json!({ "error": "appointment not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        BookingError::ConcurrentModification => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        BookingError::Store(err) => store_failure(err),
    }
}

async fn create_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    CurrentActor(actor): CurrentActor,
    Json(draft): Json<AppointmentDraft>,
) -> Response {
    match state.booking.create(draft, &actor) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => booking_failure(err),
    }
}

async fn update_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(draft): Json<AppointmentDraft>,
) -> Response {
    match state.booking.update(AppointmentId(id), draft, &actor) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => booking_failure(err),
    }
}

async fn delete_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Response {
    match state.booking.delete(AppointmentId(id), &actor) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => booking_failure(err),
    }
}

async fn approve_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Response {
    match state.approvals.approve(AppointmentId(id), &actor) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => booking_failure(err),
    }
}

async fn revoke_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Response {
    match state.approvals.revoke(AppointmentId(id), &actor) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => booking_failure(err),
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    date: Option<String>,
}

async fn list_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> Response {
    let result = match query.date.as_deref() {
        Some(raw) => {
            let date = match parse_date(raw) {
                Ok(date) => date,
                Err(response) => return response,
            };
            state.directory.appointments_on(date, &actor)
        }
        None => state.directory.appointments_for(&actor),
    };

    match result {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(err) => store_failure(err),
    }
}

async fn pending_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    CurrentActor(actor): CurrentActor,
) -> Response {
    if !actor.is_admin() {
        return forbidden("the pending queue requires the admin role");
    }

    match state.directory.pending_appointments() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(err) => store_failure(err),
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    date: String,
    start: String,
    end: String,
}

async fn available_trainers_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    Query(query): Query<AvailabilityQuery>,
) -> Response {
    let date = match parse_date(&query.date) {
        Ok(date) => date,
        Err(response) => return response,
    };
    let start = match parse_time(&query.start) {
        Ok(start) => start,
        Err(response) => return response,
    };
    let end = match parse_time(&query.end) {
        Ok(end) => end,
        Err(response) => return response,
    };
    if start >= end {
        return bad_request("start time must come before end time".to_string());
    }

    match state.directory.available_trainers(date, start, end) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(err) => store_failure(err),
    }
}

async fn options_by_trainer_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    Path(id): Path<i64>,
) -> Response {
    match state.directory.options_by_trainer(TrainerId(id)) {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(err) => store_failure(err),
    }
}

async fn options_by_venue_handler<S: EntityStore + 'static>(
    State(state): State<SchedulingState<S>>,
    Path(id): Path<i64>,
) -> Response {
    match state.directory.options_by_venue(VenueId(id)) {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(err) => store_failure(err),
    }
}
