use anyhow::{anyhow, Result};
use async_trait::async_trait;
use csv::StringRecord;
use tracing::{info, warn};

use super::connection::CsvConnection;
use crate::domain::models::timestamp::{format_timestamp, parse_timestamp};
use crate::domain::models::SleepEvent;
use crate::storage::SleepStorage;

const HEADER: [&str; 3] = ["id", "start", "end"];

/// CSV-based sleep log
#[derive(Debug, Clone)]
pub struct SleepRepository {
    connection: CsvConnection,
}

impl SleepRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn parse_record(record: &StringRecord) -> Result<SleepEvent> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .ok_or_else(|| anyhow!("missing '{}' column", name))
        };

        let id = field(0, "id")?.trim().to_string();
        if id.is_empty() {
            return Err(anyhow!("empty id"));
        }

        Ok(SleepEvent {
            id,
            start: parse_timestamp(field(1, "start")?)?,
            end: parse_timestamp(field(2, "end")?)?,
        })
    }

    fn to_record(event: &SleepEvent) -> Vec<String> {
        vec![
            event.id.clone(),
            format_timestamp(&event.start),
            format_timestamp(&event.end),
        ]
    }

    fn read_events(&self) -> Result<Vec<SleepEvent>> {
        let path = self.connection.sleep_log_file_path();
        let records = self.connection.read_records(&path)?;

        let events = records
            .iter()
            .enumerate()
            .filter_map(|(row, record)| match Self::parse_record(record) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!("Skipping malformed sleep row {}: {}", row + 1, e);
                    None
                }
            })
            .collect();

        Ok(events)
    }
}

#[async_trait]
impl SleepStorage for SleepRepository {
    async fn list_sleep_events(&self) -> Result<Vec<SleepEvent>> {
        self.read_events()
    }

    async fn append_sleep_event(&self, event: &SleepEvent) -> Result<()> {
        info!("Appending sleep event to CSV: {}", event.id);
        let path = self.connection.sleep_log_file_path();
        self.connection.append_record(&path, &HEADER, &Self::to_record(event))
    }

    async fn delete_sleep_event(&self, event_id: &str) -> Result<bool> {
        info!("Deleting sleep event from CSV: {}", event_id);

        let path = self.connection.sleep_log_file_path();
        if !self.connection.delete_records_with_id(&path, event_id)? {
            warn!("Sleep event not found for deletion: {}", event_id);
            return Ok(false);
        }

        info!("Successfully deleted sleep event: {}", event_id);
        Ok(true)
    }
}
