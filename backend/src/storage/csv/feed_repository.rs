use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use csv::StringRecord;
use shared::{BreastSide, FeedKind};
use tracing::{info, warn};

use super::connection::CsvConnection;
use crate::domain::models::timestamp::{format_timestamp, parse_timestamp};
use crate::domain::models::FeedEvent;
use crate::storage::FeedStorage;

const HEADER: [&str; 7] = ["id", "kind", "start", "end", "amount", "side", "notes"];

/// CSV-based feeding log
#[derive(Debug, Clone)]
pub struct FeedRepository {
    connection: CsvConnection,
}

impl FeedRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn parse_record(record: &StringRecord) -> Result<FeedEvent> {
        if record.len() < HEADER.len() {
            return Err(anyhow!(
                "expected {} columns, found {}",
                HEADER.len(),
                record.len()
            ));
        }

        let id = record[0].trim().to_string();
        if id.is_empty() {
            return Err(anyhow!("empty id"));
        }

        let kind = FeedKind::parse(record[1].trim()).map_err(|e| anyhow!(e))?;

        // Blank amount means nothing was measured
        let amount = record[4].trim();
        let amount_ounces = if amount.is_empty() {
            0.0
        } else {
            let parsed = amount
                .parse::<f64>()
                .with_context(|| format!("invalid amount '{}'", amount))?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(anyhow!("amount out of range '{}'", amount));
            }
            parsed
        };

        let side = BreastSide::parse_optional(record[5].trim()).map_err(|e| anyhow!(e))?;

        Ok(FeedEvent {
            id,
            kind,
            start: parse_timestamp(&record[2])?,
            end: parse_timestamp(&record[3])?,
            amount_ounces,
            side,
            notes: record[6].to_string(),
        })
    }

    fn to_record(event: &FeedEvent) -> Vec<String> {
        vec![
            event.id.clone(),
            event.kind.as_str().to_string(),
            format_timestamp(&event.start),
            format_timestamp(&event.end),
            event.amount_ounces.to_string(),
            event.side.map(|s| s.as_str().to_string()).unwrap_or_default(),
            event.notes.clone(),
        ]
    }

    fn read_events(&self) -> Result<Vec<FeedEvent>> {
        let path = self.connection.feed_log_file_path();
        let records = self.connection.read_records(&path)?;

        let mut events = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            match Self::parse_record(record) {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping malformed feeding row {}: {}", row + 1, e),
            }
        }
        Ok(events)
    }
}

#[async_trait]
impl FeedStorage for FeedRepository {
    async fn list_feed_events(&self) -> Result<Vec<FeedEvent>> {
        self.read_events()
    }

    async fn append_feed_event(&self, event: &FeedEvent) -> Result<()> {
        info!("Appending feed event to CSV: {} ({})", event.id, event.kind);
        let path = self.connection.feed_log_file_path();
        self.connection.append_record(&path, &HEADER, &Self::to_record(event))
    }

    async fn delete_feed_event(&self, event_id: &str) -> Result<bool> {
        info!("Deleting feed event from CSV: {}", event_id);

        let path = self.connection.feed_log_file_path();
        if !self.connection.delete_records_with_id(&path, event_id)? {
            warn!("Feed event not found for deletion: {}", event_id);
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn breast_feed(id: &str, start: &str, side: Option<BreastSide>) -> FeedEvent {
        FeedEvent {
            id: id.to_string(),
            kind: FeedKind::Breast,
            start: parse_timestamp(start).unwrap(),
            end: parse_timestamp(start).unwrap() + chrono::Duration::minutes(20),
            amount_ounces: 0.0,
            side,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_append_and_read_preserves_fields() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeedRepository::new(env.connection.clone());

        let bottle = FeedEvent {
            id: "feed::1".to_string(),
            kind: FeedKind::Bottle,
            start: parse_timestamp("2025-01-01T08:00").unwrap(),
            end: parse_timestamp("2025-01-01T08:20").unwrap(),
            amount_ounces: 3.5,
            side: None,
            notes: "spit up a little, then finished".to_string(),
        };
        let breast = breast_feed("feed::2", "2025-01-01T12:00", Some(BreastSide::Right));

        repo.append_feed_event(&bottle).await.unwrap();
        repo.append_feed_event(&breast).await.unwrap();

        assert_eq!(repo.list_feed_events().await.unwrap(), vec![bottle, breast]);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeedRepository::new(env.connection.clone());

        let first = breast_feed("feed::1", "2025-01-01T08:00", Some(BreastSide::Left));
        let second = breast_feed("feed::2", "2025-01-01T12:00", Some(BreastSide::Right));
        repo.append_feed_event(&first).await.unwrap();
        repo.append_feed_event(&second).await.unwrap();

        assert!(repo.delete_feed_event("feed::2").await.unwrap());
        assert!(!repo.delete_feed_event("feed::404").await.unwrap());
        assert_eq!(repo.list_feed_events().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn test_blank_amount_and_bad_rows() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeedRepository::new(env.connection.clone());

        std::fs::write(
            env.connection.feed_log_file_path(),
            "id,kind,start,end,amount,side,notes\n\
             feed::1,breast,2025-01-01T08:00,2025-01-01T08:20,,Left,\n\
             feed::2,bottle,2025-01-01T09:00,2025-01-01T09:10,lots,,\n\
             feed::3,formula,2025-01-01T10:00,2025-01-01T10:10,2,,\n\
             feed::4,breast,2025-01-01T11:00,2025-01-01T11:10,0,left,\n\
             feed::5,bottle,2025-01-01T12:00,2025-01-01T12:10,4\n\
             feed::6,bottle,2025-01-01T13:00,2025-01-01T13:10,4,,ok\n\
             feed::7,bottle,2025-01-01T14:00,2025-01-01T14:10,NaN,,\n\
             feed::8,bottle,2025-01-01T15:00,2025-01-01T15:10,inf,,\n\
             feed::9,bottle,2025-01-01T16:00,2025-01-01T16:10,-3,,\n",
        )
        .unwrap();

        let events = repo.list_feed_events().await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["feed::1", "feed::6"]);
        assert_eq!(events[0].amount_ounces, 0.0);
        assert_eq!(events[0].side, Some(BreastSide::Left));
        assert_eq!(events[1].amount_ounces, 4.0);
    }

    #[tokio::test]
    async fn test_unreadable_bytes_skip_only_that_row() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeedRepository::new(env.connection.clone());

        let mut contents = b"id,kind,start,end,amount,side,notes\n\
            feed::1,bottle,2025-01-01T08:00,2025-01-01T08:20,3,,\n\
            feed::2,bottle,2025-01-01T09:00,2025-01-01T09:20,3,,caf"
            .to_vec();
        contents.push(0xE9);
        contents.push(b'\n');
        std::fs::write(env.connection.feed_log_file_path(), contents).unwrap();

        let events = repo.list_feed_events().await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["feed::1"]);
    }

    #[tokio::test]
    async fn test_delete_keeps_hand_edited_rows() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeedRepository::new(env.connection.clone());
        let path = env.connection.feed_log_file_path();

        std::fs::write(
            &path,
            "id,kind,start,end,amount,side,notes\n\
             feed::1,bottle,2025-01-01T06:00,2025-01-01T06:20,3,,\n\
             feed::2,breast,2025-01-01T8am,2025-01-01T08:20,,Left,hand-edited\n\
             feed::3,bottle,2025-01-01T10:00,2025-01-01T10:20,3,,\n",
        )
        .unwrap();

        assert!(repo.delete_feed_event("feed::3").await.unwrap());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("feed::2,breast,2025-01-01T8am,2025-01-01T08:20,,Left,hand-edited"));
        assert!(!contents.contains("feed::3"));
        let ids: Vec<String> = repo
            .list_feed_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["feed::1"]);
    }
}
