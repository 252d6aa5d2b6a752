//! # Server-Rendered Page
//!
//! `GET /` renders the dashboard; every form posts to a handler here that
//! performs one mutation and redirects back to `/?tz=<zone>`. Rejected input
//! re-renders the page with the error and a 4xx status instead of redirecting.

pub mod render;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;
use chrono_tz::Tz;
use serde::Deserialize;
use shared::{BreastSide, FeedKind, LogFeedRequest, LogSleepRequest, SaveProfileRequest};
use tracing::{info, warn};

use self::render::{page_url, render_page};
use super::rest::mappers::feed_mapper::FeedMapper;
use super::rest::mappers::profile_mapper::ProfileMapper;
use super::rest::mappers::sleep_mapper::SleepMapper;
use super::rest::{error_response, status_for};
use super::{resolve_zone, ZoneQuery};
use crate::domain::commands::sleep::ConfirmSleepCommand;
use crate::domain::ValidationError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/profile", post(save_profile))
        .route("/log_sleep", post(log_sleep))
        .route("/log_feed", post(log_feed))
        .route("/delete_sleep", post(delete_sleep))
        .route("/delete_feed", post(delete_feed))
        .route("/sleep/start", post(start_sleep))
        .route("/sleep/end", post(end_sleep))
        .route("/sleep/confirm", post(confirm_sleep))
        .route("/sleep/discard", post(discard_sleep))
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub birthday: String,
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SleepForm {
    pub sleep_start: String,
    pub sleep_end: String,
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedForm {
    pub kind: Option<String>,
    pub feed_time: String,
    pub feed_end: Option<String>,
    pub amount: Option<String>,
    pub side: Option<String>,
    pub notes: Option<String>,
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: String,
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneForm {
    pub tz: Option<String>,
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> Response {
    info!("GET / - tz: {:?}", query.tz);

    let zone_requested = query.tz.as_deref().is_some_and(|tz| !tz.trim().is_empty());
    let zone = resolve_zone(query.tz.as_deref(), state.default_zone);
    page(&state, zone, zone_requested, StatusCode::OK, None).await
}

async fn page(
    state: &AppState,
    zone: Tz,
    zone_requested: bool,
    status: StatusCode,
    error: Option<&str>,
) -> Response {
    match state.dashboard_service.build_dashboard(zone, Utc::now()).await {
        Ok(dashboard) => (status, Html(render_page(&dashboard, zone_requested, error))).into_response(),
        Err(e) => error_response("render dashboard", e),
    }
}

/// Redirect home on success; re-render with the message on rejected input
async fn finish(state: &AppState, zone: Tz, action: &str, result: anyhow::Result<()>) -> Response {
    match result {
        Ok(()) => Redirect::to(&page_url(zone)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_client_error() {
                warn!("Rejected form to {}: {}", action, e);
                page(state, zone, true, status, Some(&e.to_string())).await
            } else {
                error_response(action, e)
            }
        }
    }
}

pub async fn save_profile(State(state): State<AppState>, Form(form): Form<ProfileForm>) -> Response {
    info!("POST /profile - name: {}", form.name);

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let command = ProfileMapper::to_command(SaveProfileRequest {
        name: form.name,
        birthdate: form.birthday,
    });
    let result = state.profile_service.save_profile(command).await.map(|_| ());
    finish(&state, zone, "save profile", result).await
}

pub async fn log_sleep(State(state): State<AppState>, Form(form): Form<SleepForm>) -> Response {
    info!("POST /log_sleep - {} to {}", form.sleep_start, form.sleep_end);

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let request = LogSleepRequest {
        start: form.sleep_start,
        end: form.sleep_end,
        timezone: None,
    };
    let result = match SleepMapper::to_log_command(&request, zone) {
        Ok(command) => state.sleep_log_service.log_sleep(command).await.map(|_| ()),
        Err(e) => Err(e.into()),
    };
    finish(&state, zone, "log sleep", result).await
}

/// Turn the loosely typed form into an API request
fn feed_request(form: FeedForm) -> Result<LogFeedRequest, ValidationError> {
    let kind = match form.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(kind) => FeedKind::parse(kind).map_err(ValidationError::new)?,
        None => FeedKind::Breast,
    };

    let amount_ounces = match form.amount.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        Some(amount) => Some(
            amount
                .parse::<f64>()
                .map_err(|_| ValidationError::new(format!("Invalid amount '{}'", amount)))?,
        ),
        None => None,
    };

    let side = BreastSide::parse_optional(form.side.as_deref().unwrap_or(""))
        .map_err(ValidationError::new)?;

    Ok(LogFeedRequest {
        kind,
        start: form.feed_time,
        end: form.feed_end,
        amount_ounces,
        side,
        notes: form.notes.unwrap_or_default(),
        timezone: form.tz,
    })
}

pub async fn log_feed(State(state): State<AppState>, Form(form): Form<FeedForm>) -> Response {
    info!("POST /log_feed - {:?}", form);

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let command = feed_request(form).and_then(|request| FeedMapper::to_log_command(request, zone));
    let result = match command {
        Ok(command) => state.feed_log_service.log_feed(command).await.map(|_| ()),
        Err(e) => Err(e.into()),
    };
    finish(&state, zone, "log feed", result).await
}

pub async fn delete_sleep(State(state): State<AppState>, Form(form): Form<DeleteForm>) -> Response {
    info!("POST /delete_sleep - id: {}", form.id);

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let result = state.sleep_log_service.delete_sleep(&form.id).await.map(|_| ());
    finish(&state, zone, "delete sleep entry", result).await
}

pub async fn delete_feed(State(state): State<AppState>, Form(form): Form<DeleteForm>) -> Response {
    info!("POST /delete_feed - id: {}", form.id);

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let result = state.feed_log_service.delete_feed(&form.id).await.map(|_| ());
    finish(&state, zone, "delete feed entry", result).await
}

pub async fn start_sleep(State(state): State<AppState>, Form(form): Form<ZoneForm>) -> Response {
    info!("POST /sleep/start");

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let result = state.tracker_service.start(Utc::now()).await.map(|_| ());
    finish(&state, zone, "start sleep", result).await
}

pub async fn end_sleep(State(state): State<AppState>, Form(form): Form<ZoneForm>) -> Response {
    info!("POST /sleep/end");

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let result = state.tracker_service.end(Utc::now()).await.map(|_| ());
    finish(&state, zone, "end sleep", result).await
}

pub async fn confirm_sleep(State(state): State<AppState>, Form(form): Form<SleepForm>) -> Response {
    info!("POST /sleep/confirm - {} to {}", form.sleep_start, form.sleep_end);

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let request = LogSleepRequest {
        start: form.sleep_start,
        end: form.sleep_end,
        timezone: None,
    };
    let result = match SleepMapper::to_log_command(&request, zone) {
        Ok(command) => state
            .tracker_service
            .confirm(ConfirmSleepCommand {
                start: command.start,
                end: command.end,
            })
            .await
            .map(|_| ()),
        Err(e) => Err(e.into()),
    };
    finish(&state, zone, "confirm sleep", result).await
}

pub async fn discard_sleep(State(state): State<AppState>, Form(form): Form<ZoneForm>) -> Response {
    info!("POST /sleep/discard");

    let zone = resolve_zone(form.tz.as_deref(), state.default_zone);
    let result = state.tracker_service.discard().await.map(|_| ());
    finish(&state, zone, "discard sleep", result).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: &str, amount: &str, side: &str) -> FeedForm {
        FeedForm {
            kind: Some(kind.to_string()),
            feed_time: "2025-01-01T08:00".to_string(),
            feed_end: None,
            amount: Some(amount.to_string()),
            side: Some(side.to_string()),
            notes: None,
            tz: None,
        }
    }

    #[test]
    fn test_feed_form_conversion() {
        let request = feed_request(form("bottle", "3.5", "")).unwrap();
        assert_eq!(request.kind, FeedKind::Bottle);
        assert_eq!(request.amount_ounces, Some(3.5));
        assert_eq!(request.side, None);
        assert_eq!(request.notes, "");

        let request = feed_request(form("", "", "Left")).unwrap();
        assert_eq!(request.kind, FeedKind::Breast);
        assert_eq!(request.amount_ounces, None);
        assert_eq!(request.side, Some(BreastSide::Left));
    }

    #[test]
    fn test_feed_form_rejects_bad_values() {
        assert!(feed_request(form("spoon", "", "")).is_err());
        assert!(feed_request(form("bottle", "lots", "")).is_err());
        assert!(feed_request(form("breast", "", "Middle")).is_err());
    }
}
