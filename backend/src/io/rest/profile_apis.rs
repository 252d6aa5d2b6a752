//! # REST API for the Baby Profile

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use shared::SaveProfileRequest;
use tracing::info;

use super::error_response;
use super::mappers::profile_mapper::ProfileMapper;
use crate::domain::models::timestamp::local_date;
use crate::io::{resolve_zone, ZoneQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(save_profile))
}

/// Get the profile and the baby's age as of today in the requested zone
pub async fn get_profile(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> impl IntoResponse {
    info!("GET /api/profile");

    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    match state.profile_service.get_profile().await {
        Ok(profile) => {
            let today = local_date(&Utc::now(), zone);
            (StatusCode::OK, Json(ProfileMapper::to_profile_response(profile, today))).into_response()
        }
        Err(e) => error_response("load profile", e),
    }
}

pub async fn save_profile(
    State(state): State<AppState>,
    Json(request): Json<SaveProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profile - request: {:?}", request);

    match state
        .profile_service
        .save_profile(ProfileMapper::to_command(request))
        .await
    {
        Ok(profile) => {
            let today = local_date(&Utc::now(), state.default_zone);
            let response = ProfileMapper::to_profile_response(Some(profile), today);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("save profile", e),
    }
}
