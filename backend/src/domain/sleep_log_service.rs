use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::MutexGuard;
use tracing::{info, warn};

use super::commands::sleep::LogSleepCommand;
use super::models::SleepEvent;
use super::{MutationLock, ValidationError};
use crate::storage::SleepStorage;

/// Service for the sleep log
#[derive(Clone)]
pub struct SleepLogService {
    storage: Arc<dyn SleepStorage>,
    lock: MutationLock,
}

impl SleepLogService {
    pub fn new(storage: Arc<dyn SleepStorage>, lock: MutationLock) -> Self {
        Self { storage, lock }
    }

    /// All sleep events in log order
    pub async fn list_sleep(&self) -> Result<Vec<SleepEvent>> {
        self.storage.list_sleep_events().await
    }

    /// Append a manually entered sleep interval. The tracker is not involved.
    pub async fn log_sleep(&self, command: LogSleepCommand) -> Result<SleepEvent> {
        info!("Logging sleep: {} to {}", command.start, command.end);

        validate_interval(command.start, command.end)?;

        let guard = self.lock.lock().await;
        self.append_locked(&guard, command.start, command.end).await
    }

    /// Append a sleep event while the caller already holds the mutation lock
    pub(crate) async fn append_locked(
        &self,
        _guard: &MutexGuard<'_, ()>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SleepEvent> {
        let existing = self.storage.list_sleep_events().await?;

        let mut millis = Utc::now().timestamp_millis();
        while existing
            .iter()
            .any(|event| event.id == SleepEvent::generate_id(millis))
        {
            millis += 1;
        }

        let event = SleepEvent {
            id: SleepEvent::generate_id(millis),
            start,
            end,
        };
        self.storage.append_sleep_event(&event).await?;

        info!(
            "Logged sleep {} ({:.2}h)",
            event.id,
            event.duration_hours()
        );
        Ok(event)
    }

    /// Delete by id. Unknown ids are not an error.
    pub async fn delete_sleep(&self, event_id: &str) -> Result<bool> {
        info!("Deleting sleep event: {}", event_id);

        let _guard = self.lock.lock().await;
        let deleted = self.storage.delete_sleep_event(event_id).await?;
        if !deleted {
            warn!("Sleep event {} was not found", event_id);
        }
        Ok(deleted)
    }
}

/// A sleep must not end before it starts
pub(crate) fn validate_interval(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::new("Sleep end cannot be before its start"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::timestamp::parse_timestamp;
    use crate::domain::new_mutation_lock;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn service(env: &TestEnvironment) -> SleepLogService {
        SleepLogService::new(Arc::new(env.sleep_repository()), new_mutation_lock())
    }

    fn command(start: &str, end: &str) -> LogSleepCommand {
        LogSleepCommand {
            start: parse_timestamp(start).unwrap(),
            end: parse_timestamp(end).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_log_assigns_unique_ids() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let first = service
            .log_sleep(command("2025-01-01T20:00", "2025-01-02T05:00"))
            .await
            .unwrap();
        let second = service
            .log_sleep(command("2025-01-02T13:00", "2025-01-02T14:00"))
            .await
            .unwrap();

        assert!(first.id.starts_with("sleep::"));
        assert_ne!(first.id, second.id);
        assert_eq!(service.list_sleep().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_zero_length_sleep_is_allowed() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let event = service
            .log_sleep(command("2025-01-01T20:00", "2025-01-01T20:00"))
            .await
            .unwrap();
        assert_eq!(event.duration_hours(), 0.0);
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let err = service
            .log_sleep(command("2025-01-02T05:00", "2025-01-01T20:00"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert!(service.list_sleep().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_sleep() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let event = service
            .log_sleep(command("2025-01-01T20:00", "2025-01-02T05:00"))
            .await
            .unwrap();

        assert!(service.delete_sleep(&event.id).await.unwrap());
        assert!(!service.delete_sleep(&event.id).await.unwrap());
        assert!(service.list_sleep().await.unwrap().is_empty());
    }
}
