//! # REST API for the In-Progress Sleep Tracker
//!
//! `start` and `end` stamp the current time; `confirm` commits the ended
//! session with times the caller may have corrected.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use shared::{ConfirmSleepRequest, ConfirmSleepResponse};
use tracing::info;

use super::error_response;
use super::mappers::sleep_mapper::SleepMapper;
use super::mappers::tracker_mapper::TrackerMapper;
use crate::domain::SleepTracker;
use crate::io::{resolve_zone, ZoneQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_status))
        .route("/start", post(start_sleep))
        .route("/end", post(end_sleep))
        .route("/confirm", post(confirm_sleep))
        .route("/discard", post(discard_sleep))
}

pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("GET /api/tracker");

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.tracker_service.status().await {
        Ok(tracker) => (StatusCode::OK, Json(TrackerMapper::to_status(tracker, zone))).into_response(),
        Err(e) => error_response("load sleep tracker", e),
    }
}

pub async fn start_sleep(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("POST /api/tracker/start");

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.tracker_service.start(Utc::now()).await {
        Ok(tracker) => (StatusCode::OK, Json(TrackerMapper::to_status(tracker, zone))).into_response(),
        Err(e) => error_response("start sleep", e),
    }
}

pub async fn end_sleep(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("POST /api/tracker/end");

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.tracker_service.end(Utc::now()).await {
        Ok(tracker) => (StatusCode::OK, Json(TrackerMapper::to_status(tracker, zone))).into_response(),
        Err(e) => error_response("end sleep", e),
    }
}

pub async fn confirm_sleep(
    State(state): State<AppState>,
    Json(request): Json<ConfirmSleepRequest>,
) -> impl IntoResponse {
    info!("POST /api/tracker/confirm - request: {:?}", request);

    let zone = resolve_zone(request.timezone.as_deref(), state.default_zone);
    let command = match TrackerMapper::to_confirm_command(&request, zone) {
        Ok(command) => command,
        Err(e) => return error_response("confirm sleep", e.into()),
    };

    match state.tracker_service.confirm(command).await {
        Ok(event) => {
            let response = ConfirmSleepResponse {
                entry: SleepMapper::to_dto(&event, zone),
                tracker: TrackerMapper::to_status(SleepTracker::Idle, zone),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("confirm sleep", e),
    }
}

pub async fn discard_sleep(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("POST /api/tracker/discard");

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.tracker_service.discard().await {
        Ok(tracker) => (StatusCode::OK, Json(TrackerMapper::to_status(tracker, zone))).into_response(),
        Err(e) => error_response("discard sleep", e),
    }
}
