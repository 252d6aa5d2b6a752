use anyhow::Result;
use chrono::Utc;
use shared::FeedKind;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::commands::feed::LogFeedCommand;
use super::models::FeedEvent;
use super::{MutationLock, ValidationError};
use crate::storage::FeedStorage;

/// Service for the feeding log
#[derive(Clone)]
pub struct FeedLogService {
    storage: Arc<dyn FeedStorage>,
    lock: MutationLock,
}

impl FeedLogService {
    pub fn new(storage: Arc<dyn FeedStorage>, lock: MutationLock) -> Self {
        Self { storage, lock }
    }

    /// All feed events in log order
    pub async fn list_feeds(&self) -> Result<Vec<FeedEvent>> {
        self.storage.list_feed_events().await
    }

    pub async fn log_feed(&self, command: LogFeedCommand) -> Result<FeedEvent> {
        info!(
            "Logging {} feed at {} ({} oz)",
            command.kind, command.start, command.amount_ounces
        );

        Self::validate(&command)?;

        // A side only means something for breast feeds
        let side = match command.kind {
            FeedKind::Breast => command.side,
            FeedKind::Bottle => {
                if command.side.is_some() {
                    debug!("Ignoring breast side on bottle feed");
                }
                None
            }
        };

        let _guard = self.lock.lock().await;

        let existing = self.storage.list_feed_events().await?;
        let mut millis = Utc::now().timestamp_millis();
        while existing
            .iter()
            .any(|event| event.id == FeedEvent::generate_id(millis))
        {
            millis += 1;
        }

        let event = FeedEvent {
            id: FeedEvent::generate_id(millis),
            kind: command.kind,
            start: command.start,
            end: command.end,
            amount_ounces: command.amount_ounces,
            side,
            notes: command.notes.trim().to_string(),
        };
        self.storage.append_feed_event(&event).await?;

        info!("Logged feed {}", event.id);
        Ok(event)
    }

    /// Delete by id. Unknown ids are not an error.
    pub async fn delete_feed(&self, event_id: &str) -> Result<bool> {
        info!("Deleting feed event: {}", event_id);

        let _guard = self.lock.lock().await;
        let deleted = self.storage.delete_feed_event(event_id).await?;
        if !deleted {
            warn!("Feed event {} was not found", event_id);
        }
        Ok(deleted)
    }

    fn validate(command: &LogFeedCommand) -> Result<(), ValidationError> {
        if command.end < command.start {
            return Err(ValidationError::new("Feed end cannot be before its start"));
        }
        if !command.amount_ounces.is_finite() || command.amount_ounces < 0.0 {
            return Err(ValidationError::new(format!(
                "Invalid amount {}: must be zero or more ounces",
                command.amount_ounces
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::timestamp::parse_timestamp;
    use crate::domain::new_mutation_lock;
    use crate::storage::csv::test_utils::TestEnvironment;
    use shared::BreastSide;

    fn service(env: &TestEnvironment) -> FeedLogService {
        FeedLogService::new(Arc::new(env.feed_repository()), new_mutation_lock())
    }

    fn command(kind: FeedKind, amount: f64, side: Option<BreastSide>) -> LogFeedCommand {
        LogFeedCommand {
            kind,
            start: parse_timestamp("2025-01-01T08:00").unwrap(),
            end: parse_timestamp("2025-01-01T08:20").unwrap(),
            amount_ounces: amount,
            side,
            notes: "  sleepy  ".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_and_list_feeds() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let breast = service
            .log_feed(command(FeedKind::Breast, 0.0, Some(BreastSide::Left)))
            .await
            .unwrap();
        let bottle = service
            .log_feed(command(FeedKind::Bottle, 4.0, None))
            .await
            .unwrap();

        assert_eq!(breast.notes, "sleepy");
        assert_ne!(breast.id, bottle.id);
        assert_eq!(service.list_feeds().await.unwrap(), vec![breast, bottle]);
    }

    #[tokio::test]
    async fn test_bottle_feed_drops_side() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let event = service
            .log_feed(command(FeedKind::Bottle, 3.0, Some(BreastSide::Right)))
            .await
            .unwrap();
        assert_eq!(event.side, None);
    }

    #[tokio::test]
    async fn test_invalid_feeds_are_rejected() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let err = service
            .log_feed(command(FeedKind::Bottle, -1.0, None))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());

        let mut backwards = command(FeedKind::Breast, 0.0, None);
        backwards.end = parse_timestamp("2025-01-01T07:00").unwrap();
        assert!(service.log_feed(backwards).await.is_err());

        assert!(service
            .log_feed(command(FeedKind::Bottle, f64::NAN, None))
            .await
            .is_err());

        assert!(service.list_feeds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_feed() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let event = service
            .log_feed(command(FeedKind::Bottle, 2.0, None))
            .await
            .unwrap();
        assert!(service.delete_feed(&event.id).await.unwrap());
        assert!(!service.delete_feed("feed::0").await.unwrap());
        assert!(service.list_feeds().await.unwrap().is_empty());
    }
}
