//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! Logs are returned in append order. Rows that cannot be parsed are skipped by
//! the implementation rather than failing the whole read.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{FeedEvent, PendingSleep, Profile, SleepEvent};

/// Trait defining the interface for the singleton profile record
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Load the profile, `None` if it was never saved
    async fn get_profile(&self) -> Result<Option<Profile>>;

    /// Overwrite the profile
    async fn save_profile(&self, profile: &Profile) -> Result<()>;
}

/// Trait defining the interface for the sleep log
#[async_trait]
pub trait SleepStorage: Send + Sync {
    /// All sleep events in append order
    async fn list_sleep_events(&self) -> Result<Vec<SleepEvent>>;

    /// Append one event to the end of the log
    async fn append_sleep_event(&self, event: &SleepEvent) -> Result<()>;

    /// Delete a single event by ID
    /// Returns true if the event was found and deleted, false otherwise
    async fn delete_sleep_event(&self, event_id: &str) -> Result<bool>;
}

/// Trait defining the interface for the feeding log
#[async_trait]
pub trait FeedStorage: Send + Sync {
    /// All feed events in append order
    async fn list_feed_events(&self) -> Result<Vec<FeedEvent>>;

    /// Append one event to the end of the log
    async fn append_feed_event(&self, event: &FeedEvent) -> Result<()>;

    /// Delete a single event by ID
    /// Returns true if the event was found and deleted, false otherwise
    async fn delete_feed_event(&self, event_id: &str) -> Result<bool>;
}

/// Trait defining the interface for the single pending-sleep slot
#[async_trait]
pub trait PendingSleepStorage: Send + Sync {
    async fn get_pending_sleep(&self) -> Result<Option<PendingSleep>>;

    async fn save_pending_sleep(&self, pending: &PendingSleep) -> Result<()>;

    /// Empty the slot. Clearing an empty slot is not an error.
    async fn clear_pending_sleep(&self) -> Result<()>;
}
