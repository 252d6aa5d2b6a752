use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use tracing::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::PendingSleep;
use crate::storage::PendingSleepStorage;

/// Pending sleep slot kept in a one-line text file that only exists while a
/// session is in progress.
#[derive(Debug, Clone)]
pub struct PendingSleepRepository {
    connection: CsvConnection,
}

impl PendingSleepRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl PendingSleepStorage for PendingSleepRepository {
    async fn get_pending_sleep(&self) -> Result<Option<PendingSleep>> {
        let path = self.connection.pending_sleep_file_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        match PendingSleep::decode(&contents) {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                warn!("Ignoring unreadable pending sleep in {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn save_pending_sleep(&self, pending: &PendingSleep) -> Result<()> {
        let path = self.connection.pending_sleep_file_path();
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, pending.encode())
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Saved pending sleep: {}", pending.encode());
        Ok(())
    }

    async fn clear_pending_sleep(&self) -> Result<()> {
        let path = self.connection.pending_sleep_file_path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            info!("Cleared pending sleep");
        }
        Ok(())
    }
}
