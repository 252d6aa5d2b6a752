//! # REST API for the Sleep Log

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use shared::{DeleteEntryResponse, LogSleepRequest};
use tracing::info;

use super::error_response;
use super::mappers::sleep_mapper::SleepMapper;
use crate::io::{resolve_zone, ZoneQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sleep).post(log_sleep))
        .route("/:id", delete(delete_sleep))
}

pub async fn list_sleep(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("GET /api/sleep");

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.sleep_log_service.list_sleep().await {
        Ok(events) => {
            info!("Returning {} sleep entries", events.len());
            (StatusCode::OK, Json(SleepMapper::to_list_response(&events, zone))).into_response()
        }
        Err(e) => error_response("list sleep entries", e),
    }
}

pub async fn log_sleep(
    State(state): State<AppState>,
    Json(request): Json<LogSleepRequest>,
) -> impl IntoResponse {
    info!("POST /api/sleep - request: {:?}", request);

    let zone = resolve_zone(request.timezone.as_deref(), state.default_zone);
    let command = match SleepMapper::to_log_command(&request, zone) {
        Ok(command) => command,
        Err(e) => return error_response("log sleep", e.into()),
    };

    match state.sleep_log_service.log_sleep(command).await {
        Ok(event) => (StatusCode::CREATED, Json(SleepMapper::to_dto(&event, zone))).into_response(),
        Err(e) => error_response("log sleep", e),
    }
}

pub async fn delete_sleep(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/sleep/{}", id);

    match state.sleep_log_service.delete_sleep(&id).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteEntryResponse { deleted })).into_response(),
        Err(e) => error_response("delete sleep entry", e),
    }
}
