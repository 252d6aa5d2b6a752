use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use super::commands::profile::SaveProfileCommand;
use super::models::Profile;
use super::{MutationLock, ValidationError};
use crate::storage::ProfileStorage;

const MAX_NAME_LENGTH: usize = 100;

/// Service for the singleton baby profile
#[derive(Clone)]
pub struct ProfileService {
    storage: Arc<dyn ProfileStorage>,
    lock: MutationLock,
}

impl ProfileService {
    pub fn new(storage: Arc<dyn ProfileStorage>, lock: MutationLock) -> Self {
        Self { storage, lock }
    }

    /// Get the saved profile, if any
    pub async fn get_profile(&self) -> Result<Option<Profile>> {
        debug!("Loading profile");
        self.storage.get_profile().await
    }

    /// Validate and overwrite the profile
    pub async fn save_profile(&self, command: SaveProfileCommand) -> Result<Profile> {
        info!("Saving profile: name={}, birthdate={}", command.name, command.birthdate);

        let profile = Self::validate(command)?;

        let _guard = self.lock.lock().await;
        self.storage.save_profile(&profile).await?;

        info!("Saved profile for {}", profile.name);
        Ok(profile)
    }

    fn validate(command: SaveProfileCommand) -> Result<Profile, ValidationError> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("Name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::new(format!(
                "Name cannot be longer than {} characters",
                MAX_NAME_LENGTH
            )));
        }

        let profile = Profile {
            name: name.to_string(),
            birthdate: command.birthdate.trim().to_string(),
        };
        if profile.birthdate_date().is_none() {
            return Err(ValidationError::new(format!(
                "Invalid birthdate '{}': expected YYYY-MM-DD",
                profile.birthdate
            )));
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::new_mutation_lock;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn service(env: &TestEnvironment) -> ProfileService {
        ProfileService::new(Arc::new(env.profile_repository()), new_mutation_lock())
    }

    fn command(name: &str, birthdate: &str) -> SaveProfileCommand {
        SaveProfileCommand {
            name: name.to_string(),
            birthdate: birthdate.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_get_profile() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        assert_eq!(service.get_profile().await.unwrap(), None);

        let saved = service.save_profile(command("  Ada  ", "2025-01-01")).await.unwrap();
        assert_eq!(saved.name, "Ada");

        let loaded = service.get_profile().await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_invalid_profiles_are_rejected() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        for (name, birthdate) in [("", "2025-01-01"), ("Ada", "01/01/2025"), ("Ada", "")] {
            let err = service.save_profile(command(name, birthdate)).await.unwrap_err();
            assert!(err.downcast_ref::<ValidationError>().is_some(), "{}", err);
        }

        let long_name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(service.save_profile(command(&long_name, "2025-01-01")).await.is_err());

        // Nothing was written
        assert_eq!(service.get_profile().await.unwrap(), None);
    }
}
