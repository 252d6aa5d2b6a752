//! # Baby Tracker Backend
//!
//! Records an infant's sleep and feedings and derives rolling 24-hour totals,
//! age-banded advice and a live sleep timer from them.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (HTML page, JSON REST API)
//!     ↓
//! Domain Layer (aggregator, advice, sleep tracker, services)
//!     ↓
//! Storage Layer (CSV files in the data directory)
//! ```
//!
//! [`initialize_backend`] builds the storage handles and services once;
//! [`create_router`] wires them into an axum `Router`.

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use anyhow::Result;
use axum::{http::Method, Router};
use chrono_tz::Tz;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    new_mutation_lock, DashboardService, FeedLogService, ProfileService, SleepLogService,
    SleepTrackerService,
};
use crate::io::{html, rest};
use crate::storage::csv::{
    CsvConnection, FeedRepository, PendingSleepRepository, ProfileRepository, SleepRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
    pub sleep_log_service: SleepLogService,
    pub feed_log_service: FeedLogService,
    pub tracker_service: SleepTrackerService,
    pub dashboard_service: DashboardService,
    /// Display zone for requests that do not name one
    pub default_zone: Tz,
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up CSV storage in {}", config.data_directory.display());
    let connection = CsvConnection::new(&config.data_directory)?;

    info!("Setting up domain services");
    let lock = new_mutation_lock();
    let profile_service = ProfileService::new(
        Arc::new(ProfileRepository::new(connection.clone())),
        lock.clone(),
    );
    let sleep_log_service = SleepLogService::new(
        Arc::new(SleepRepository::new(connection.clone())),
        lock.clone(),
    );
    let feed_log_service = FeedLogService::new(
        Arc::new(FeedRepository::new(connection.clone())),
        lock.clone(),
    );
    let tracker_service = SleepTrackerService::new(
        Arc::new(PendingSleepRepository::new(connection)),
        sleep_log_service.clone(),
        lock,
    );
    let dashboard_service = DashboardService::new(
        profile_service.clone(),
        sleep_log_service.clone(),
        feed_log_service.clone(),
        tracker_service.clone(),
    );

    Ok(AppState {
        profile_service,
        sleep_log_service,
        feed_log_service,
        tracker_service,
        dashboard_service,
        default_zone: config.default_timezone,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/profile", rest::profile_apis::router())
        .nest("/sleep", rest::sleep_apis::router())
        .nest("/feeds", rest::feed_apis::router())
        .nest("/tracker", rest::tracker_apis::router())
        .nest("/dashboard", rest::dashboard_apis::router())
        .layer(cors);

    Router::new()
        .merge(html::router())
        .nest("/api", api_routes)
        .with_state(app_state)
}
