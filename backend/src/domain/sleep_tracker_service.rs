//! Persistence around the [`SleepTracker`] state machine.
//!
//! The state is never cached in memory: every call reloads the pending slot
//! under the mutation lock, applies one transition and writes the result back.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::sleep::ConfirmSleepCommand;
use super::models::SleepEvent;
use super::sleep_log_service::{validate_interval, SleepLogService};
use super::sleep_tracker::SleepTracker;
use super::MutationLock;
use crate::storage::PendingSleepStorage;

#[derive(Clone)]
pub struct SleepTrackerService {
    pending: Arc<dyn PendingSleepStorage>,
    sleep_log: SleepLogService,
    lock: MutationLock,
}

impl SleepTrackerService {
    pub fn new(
        pending: Arc<dyn PendingSleepStorage>,
        sleep_log: SleepLogService,
        lock: MutationLock,
    ) -> Self {
        Self {
            pending,
            sleep_log,
            lock,
        }
    }

    /// Current tracker state
    pub async fn status(&self) -> Result<SleepTracker> {
        let pending = self.pending.get_pending_sleep().await?;
        Ok(SleepTracker::from_pending(pending.as_ref()))
    }

    pub async fn start(&self, now: DateTime<Utc>) -> Result<SleepTracker> {
        info!("Starting sleep session at {}", now);
        let _guard = self.lock.lock().await;

        let next = self.status().await?.start(now)?;
        self.persist(&next).await?;
        Ok(next)
    }

    pub async fn end(&self, now: DateTime<Utc>) -> Result<SleepTracker> {
        info!("Ending sleep session at {}", now);
        let _guard = self.lock.lock().await;

        let next = self.status().await?.end(now)?;
        self.persist(&next).await?;
        Ok(next)
    }

    /// Commit the ended session with the (possibly edited) times the caller
    /// confirmed, then return to idle.
    ///
    /// The pending slot is cleared before the event is appended and put back
    /// if the append fails, so a retry never logs the same session twice.
    pub async fn confirm(&self, command: ConfirmSleepCommand) -> Result<SleepEvent> {
        info!("Confirming sleep session: {} to {}", command.start, command.end);
        let guard = self.lock.lock().await;

        let current = self.status().await?;
        let next = current.confirm()?;
        validate_interval(command.start, command.end)?;

        self.persist(&next).await?;
        let event = match self
            .sleep_log
            .append_locked(&guard, command.start, command.end)
            .await
        {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to log confirmed sleep, restoring pending session: {}", e);
                self.persist(&current).await?;
                return Err(e);
            }
        };

        info!("Sleep session committed as {}", event.id);
        Ok(event)
    }

    /// Drop the pending session without logging anything
    pub async fn discard(&self) -> Result<SleepTracker> {
        info!("Discarding sleep session");
        let _guard = self.lock.lock().await;

        let next = self.status().await?.discard()?;
        self.persist(&next).await?;
        Ok(next)
    }

    async fn persist(&self, state: &SleepTracker) -> Result<()> {
        match state.to_pending() {
            Some(pending) => self.pending.save_pending_sleep(&pending).await,
            None => self.pending.clear_pending_sleep().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::timestamp::parse_timestamp;
    use crate::domain::{new_mutation_lock, TrackerError, ValidationError};
    use crate::storage::csv::test_utils::TestEnvironment;

    fn ts(value: &str) -> DateTime<Utc> {
        parse_timestamp(value).unwrap()
    }

    fn services(env: &TestEnvironment) -> (SleepTrackerService, SleepLogService) {
        let lock = new_mutation_lock();
        let sleep_log = SleepLogService::new(Arc::new(env.sleep_repository()), lock.clone());
        let tracker = SleepTrackerService::new(
            Arc::new(env.pending_sleep_repository()),
            sleep_log.clone(),
            lock,
        );
        (tracker, sleep_log)
    }

    fn tracker_error(err: &anyhow::Error) -> Option<TrackerError> {
        err.downcast_ref::<TrackerError>().cloned()
    }

    #[tokio::test]
    async fn test_start_end_confirm_logs_one_event() {
        let env = TestEnvironment::new().unwrap();
        let (tracker, sleep_log) = services(&env);

        assert_eq!(tracker.status().await.unwrap(), SleepTracker::Idle);

        tracker.start(ts("2025-01-01T20:00")).await.unwrap();
        let ended = tracker.end(ts("2025-01-02T06:00")).await.unwrap();
        assert_eq!(
            ended,
            SleepTracker::Ended {
                start: ts("2025-01-01T20:00"),
                end: ts("2025-01-02T06:00"),
            }
        );

        let event = tracker
            .confirm(ConfirmSleepCommand {
                start: ts("2025-01-01T20:15"),
                end: ts("2025-01-02T06:00"),
            })
            .await
            .unwrap();

        assert_eq!(event.start, ts("2025-01-01T20:15"));
        assert_eq!(sleep_log.list_sleep().await.unwrap(), vec![event]);
        assert_eq!(tracker.status().await.unwrap(), SleepTracker::Idle);
        assert!(!env.connection.pending_sleep_file_path().exists());
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let env = TestEnvironment::new().unwrap();
        let (tracker, _) = services(&env);

        tracker.start(ts("2025-01-01T20:00")).await.unwrap();

        // A fresh service over the same directory sees the pending session
        let (reloaded, _) = services(&env);
        assert_eq!(
            reloaded.status().await.unwrap(),
            SleepTracker::Started {
                start: ts("2025-01-01T20:00")
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_transitions_leave_state_unchanged() {
        let env = TestEnvironment::new().unwrap();
        let (tracker, sleep_log) = services(&env);

        let err = tracker.end(ts("2025-01-02T06:00")).await.unwrap_err();
        assert_eq!(tracker_error(&err), Some(TrackerError::NoActiveSession));
        assert_eq!(tracker.status().await.unwrap(), SleepTracker::Idle);

        let err = tracker.discard().await.unwrap_err();
        assert_eq!(tracker_error(&err), Some(TrackerError::NoActiveSession));

        let started = tracker.start(ts("2025-01-01T20:00")).await.unwrap();
        let err = tracker.start(ts("2025-01-01T21:00")).await.unwrap_err();
        assert_eq!(tracker_error(&err), Some(TrackerError::SessionAlreadyActive));

        let err = tracker
            .confirm(ConfirmSleepCommand {
                start: ts("2025-01-01T20:00"),
                end: ts("2025-01-02T06:00"),
            })
            .await
            .unwrap_err();
        assert_eq!(tracker_error(&err), Some(TrackerError::SessionNotEnded));
        assert_eq!(tracker.status().await.unwrap(), started);

        tracker.end(ts("2025-01-02T06:00")).await.unwrap();
        let err = tracker.end(ts("2025-01-02T07:00")).await.unwrap_err();
        assert_eq!(tracker_error(&err), Some(TrackerError::SessionAlreadyEnded));

        assert!(sleep_log.list_sleep().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_rejects_backwards_interval() {
        let env = TestEnvironment::new().unwrap();
        let (tracker, sleep_log) = services(&env);

        tracker.start(ts("2025-01-01T20:00")).await.unwrap();
        let ended = tracker.end(ts("2025-01-02T06:00")).await.unwrap();

        let err = tracker
            .confirm(ConfirmSleepCommand {
                start: ts("2025-01-02T06:00"),
                end: ts("2025-01-01T20:00"),
            })
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert_eq!(tracker.status().await.unwrap(), ended);
        assert!(sleep_log.list_sleep().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_discard_returns_to_idle_without_logging() {
        let env = TestEnvironment::new().unwrap();
        let (tracker, sleep_log) = services(&env);

        tracker.start(ts("2025-01-01T20:00")).await.unwrap();
        assert_eq!(tracker.discard().await.unwrap(), SleepTracker::Idle);
        assert_eq!(tracker.status().await.unwrap(), SleepTracker::Idle);
        assert!(sleep_log.list_sleep().await.unwrap().is_empty());
    }

    struct FailingSleepStorage;

    #[async_trait::async_trait]
    impl crate::storage::SleepStorage for FailingSleepStorage {
        async fn list_sleep_events(&self) -> Result<Vec<SleepEvent>> {
            Ok(Vec::new())
        }

        async fn append_sleep_event(&self, _event: &SleepEvent) -> Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        async fn delete_sleep_event(&self, _event_id: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_failed_append_keeps_session_pending() {
        let env = TestEnvironment::new().unwrap();
        let lock = new_mutation_lock();
        let tracker = SleepTrackerService::new(
            Arc::new(env.pending_sleep_repository()),
            SleepLogService::new(Arc::new(FailingSleepStorage), lock.clone()),
            lock,
        );

        tracker.start(ts("2025-01-01T20:00")).await.unwrap();
        let ended = tracker.end(ts("2025-01-02T06:00")).await.unwrap();

        let result = tracker
            .confirm(ConfirmSleepCommand {
                start: ts("2025-01-01T20:00"),
                end: ts("2025-01-02T06:00"),
            })
            .await;
        assert!(result.is_err());
        assert_eq!(tracker.status().await.unwrap(), ended);
    }
}
