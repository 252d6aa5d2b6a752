//! # REST API Interface Layer
//!
//! JSON endpoints under `/api`. Each `*_apis` module exposes a `router()` that
//! is nested by [`crate::create_router`]; `mappers` converts between the
//! `shared` DTOs and domain types.
//!
//! ## Error translation
//!
//! | Domain error           | Status |
//! |------------------------|--------|
//! | `TrackerError`         | 409    |
//! | `ValidationError`      | 400    |
//! | anything else          | 500    |

pub mod dashboard_apis;
pub mod feed_apis;
pub mod mappers;
pub mod profile_apis;
pub mod sleep_apis;
pub mod tracker_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::domain::{TrackerError, ValidationError};

/// Status code for an error coming out of a service
pub fn status_for(err: &anyhow::Error) -> StatusCode {
    if err.downcast_ref::<TrackerError>().is_some() {
        StatusCode::CONFLICT
    } else if err.downcast_ref::<ValidationError>().is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Log a failed operation and turn it into a plain-text response
pub fn error_response(action: &str, err: anyhow::Error) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Failed to {}: {:?}", action, err);
        (status, format!("Error trying to {}", action)).into_response()
    } else {
        warn!("Rejected request to {}: {}", action, err);
        (status, err.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_status_for_domain_errors() {
        assert_eq!(
            status_for(&TrackerError::NoActiveSession.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&ValidationError::new("bad").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&anyhow!("disk on fire")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_context_does_not_hide_domain_error() {
        let err = anyhow::Error::from(TrackerError::SessionAlreadyActive).context("starting sleep");
        assert_eq!(status_for(&err), StatusCode::CONFLICT);
    }
}
