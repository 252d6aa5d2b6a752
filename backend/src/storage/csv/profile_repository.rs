use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use super::connection::CsvConnection;
use crate::domain::models::Profile;
use crate::storage::ProfileStorage;

const HEADER: [&str; 2] = ["Name", "Birthday"];

/// Singleton profile stored as a one-row CSV
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    connection: CsvConnection,
}

impl ProfileRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProfileStorage for ProfileRepository {
    async fn get_profile(&self) -> Result<Option<Profile>> {
        let path = self.connection.profile_file_path();
        let records = self.connection.read_records(&path)?;

        let Some(record) = records.first() else {
            return Ok(None);
        };

        match (record.get(0), record.get(1)) {
            (Some(name), Some(birthdate)) => Ok(Some(Profile {
                name: name.to_string(),
                birthdate: birthdate.to_string(),
            })),
            _ => {
                warn!("Profile row in {} is incomplete, ignoring it", path.display());
                Ok(None)
            }
        }
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        info!("Saving profile for {}", profile.name);
        let record = vec![profile.name.clone(), profile.birthdate.clone()];
        self.connection
            .rewrite_records(&self.connection.profile_file_path(), &HEADER, &[record])
    }
}
