//! # In-Progress Sleep Tracker
//!
//! State machine for a sleep session that is timed live instead of entered
//! after the fact:
//!
//! ```text
//! Idle --start--> Started(start) --end--> Ended(start, end) --confirm--> Idle
//!                      \                        /
//!                       `------- discard ------'
//! ```
//!
//! Transitions are pure; persistence and the final sleep log append live in
//! `SleepTrackerService`. Any transition not drawn above is a `TrackerError`
//! and leaves the state untouched.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::models::PendingSleep;

/// Invalid transitions of the sleep tracker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("A sleep session is already in progress")]
    SessionAlreadyActive,
    #[error("No sleep session is in progress")]
    NoActiveSession,
    #[error("The sleep session has already ended")]
    SessionAlreadyEnded,
    #[error("The sleep session has not ended yet")]
    SessionNotEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTracker {
    Idle,
    Started {
        start: DateTime<Utc>,
    },
    Ended {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl SleepTracker {
    /// Rebuild the state from the persisted pending slot
    pub fn from_pending(pending: Option<&PendingSleep>) -> Self {
        match pending {
            None => SleepTracker::Idle,
            Some(PendingSleep { start, end: None }) => SleepTracker::Started { start: *start },
            Some(PendingSleep { start, end: Some(end) }) => SleepTracker::Ended {
                start: *start,
                end: *end,
            },
        }
    }

    /// Value to persist in the pending slot; `None` clears it
    pub fn to_pending(&self) -> Option<PendingSleep> {
        match *self {
            SleepTracker::Idle => None,
            SleepTracker::Started { start } => Some(PendingSleep { start, end: None }),
            SleepTracker::Ended { start, end } => Some(PendingSleep {
                start,
                end: Some(end),
            }),
        }
    }

    pub fn start(&self, now: DateTime<Utc>) -> Result<Self, TrackerError> {
        match self {
            SleepTracker::Idle => Ok(SleepTracker::Started { start: now }),
            _ => Err(TrackerError::SessionAlreadyActive),
        }
    }

    pub fn end(&self, now: DateTime<Utc>) -> Result<Self, TrackerError> {
        match *self {
            SleepTracker::Idle => Err(TrackerError::NoActiveSession),
            SleepTracker::Started { start } => Ok(SleepTracker::Ended { start, end: now }),
            SleepTracker::Ended { .. } => Err(TrackerError::SessionAlreadyEnded),
        }
    }

    /// Move to `Idle` after the ended session has been committed
    pub fn confirm(&self) -> Result<Self, TrackerError> {
        match self {
            SleepTracker::Idle => Err(TrackerError::NoActiveSession),
            SleepTracker::Started { .. } => Err(TrackerError::SessionNotEnded),
            SleepTracker::Ended { .. } => Ok(SleepTracker::Idle),
        }
    }

    pub fn discard(&self) -> Result<Self, TrackerError> {
        match self {
            SleepTracker::Idle => Err(TrackerError::NoActiveSession),
            _ => Ok(SleepTracker::Idle),
        }
    }
}
