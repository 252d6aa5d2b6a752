//! # Domain Module
//!
//! Business logic of the baby tracker, independent of HTTP and file formats.
//!
//! ## Layers
//!
//! - **Pure derivations**: [`aggregator`] (rolling 24h totals, last-event info,
//!   next-feed tip), [`advice`] (age-banded recommendations) and
//!   [`sleep_tracker`] (start/end/confirm state machine). These take the current
//!   instant as an argument and never touch storage.
//! - **Services**: load events through the storage traits, run the
//!   derivations and persist the results.
//!
//! All writes go through a single [`MutationLock`] shared by every service, so
//! a read-modify-write on one file can never interleave with another write.

pub mod advice;
pub mod aggregator;
pub mod commands;
pub mod dashboard_service;
pub mod feed_log_service;
pub mod models;
pub mod profile_service;
pub mod sleep_log_service;
pub mod sleep_tracker;
pub mod sleep_tracker_service;

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub use dashboard_service::{Dashboard, DashboardService};
pub use feed_log_service::FeedLogService;
pub use profile_service::ProfileService;
pub use sleep_log_service::SleepLogService;
pub use sleep_tracker::{SleepTracker, TrackerError};
pub use sleep_tracker_service::SleepTrackerService;

/// Serializes every mutation of the data directory
pub type MutationLock = Arc<Mutex<()>>;

pub fn new_mutation_lock() -> MutationLock {
    Arc::new(Mutex::new(()))
}

/// Rejected user input. Carried inside `anyhow::Error` so the io layer can
/// tell it apart from storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
