//! Test utilities for CSV storage
//!
//! Every test gets its own temporary data directory so tests can run in
//! parallel without stepping on each other's files.

use anyhow::Result;
use tempfile::TempDir;

use super::{
    CsvConnection, FeedRepository, PendingSleepRepository, ProfileRepository, SleepRepository,
};

/// Isolated data directory for a single test
pub struct TestEnvironment {
    pub connection: CsvConnection,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    /// Create a new test environment with a temporary directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            _temp_dir: temp_dir,
        })
    }

    pub fn profile_repository(&self) -> ProfileRepository {
        ProfileRepository::new(self.connection.clone())
    }

    pub fn sleep_repository(&self) -> SleepRepository {
        SleepRepository::new(self.connection.clone())
    }

    pub fn feed_repository(&self) -> FeedRepository {
        FeedRepository::new(self.connection.clone())
    }

    pub fn pending_sleep_repository(&self) -> PendingSleepRepository {
        PendingSleepRepository::new(self.connection.clone())
    }
}
