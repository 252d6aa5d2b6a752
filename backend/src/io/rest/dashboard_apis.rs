//! # REST API for the Dashboard

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use tracing::info;

use super::error_response;
use super::mappers::dashboard_mapper::DashboardMapper;
use crate::io::{resolve_zone, ZoneQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// Aggregates, advice and recent entries, rendered in the requested zone
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("GET /api/dashboard - tz: {:?}", query.tz);

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.dashboard_service.build_dashboard(zone, Utc::now()).await {
        Ok(dashboard) => (StatusCode::OK, Json(DashboardMapper::to_response(dashboard))).into_response(),
        Err(e) => error_response("build dashboard", e),
    }
}
