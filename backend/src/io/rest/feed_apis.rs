//! # REST API for the Feeding Log

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use shared::{DeleteEntryResponse, LogFeedRequest};
use tracing::info;

use super::error_response;
use super::mappers::feed_mapper::FeedMapper;
use crate::io::{resolve_zone, ZoneQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feeds).post(log_feed))
        .route("/:id", delete(delete_feed))
}

pub async fn list_feeds(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("GET /api/feeds");

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.feed_log_service.list_feeds().await {
        Ok(events) => {
            info!("Returning {} feed entries", events.len());
            (StatusCode::OK, Json(FeedMapper::to_list_response(&events, zone))).into_response()
        }
        Err(e) => error_response("list feed entries", e),
    }
}

pub async fn log_feed(
    State(state): State<AppState>,
    Json(request): Json<LogFeedRequest>,
) -> impl IntoResponse {
    info!("POST /api/feeds - request: {:?}", request);

    let zone = resolve_zone(request.timezone.as_deref(), state.default_zone);
    let command = match FeedMapper::to_log_command(request, zone) {
        Ok(command) => command,
        Err(e) => return error_response("log feed", e.into()),
    };

    match state.feed_log_service.log_feed(command).await {
        Ok(event) => (StatusCode::CREATED, Json(FeedMapper::to_dto(&event, zone))).into_response(),
        Err(e) => error_response("log feed", e),
    }
}

pub async fn delete_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/feeds/{}", id);

    match state.feed_log_service.delete_feed(&id).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteEntryResponse { deleted })).into_response(),
        Err(e) => error_response("delete feed entry", e),
    }
}
