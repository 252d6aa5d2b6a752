use chrono::NaiveDate;
use shared::{Profile as SharedProfile, ProfileResponse, SaveProfileRequest};

use crate::domain::commands::profile::SaveProfileCommand;
use crate::domain::models::Profile as DomainProfile;

/// Mapper between shared profile DTOs and the domain profile
pub struct ProfileMapper;

impl ProfileMapper {
    pub fn to_command(request: SaveProfileRequest) -> SaveProfileCommand {
        SaveProfileCommand {
            name: request.name,
            birthdate: request.birthdate,
        }
    }

    pub fn to_dto(domain: DomainProfile) -> SharedProfile {
        SharedProfile {
            name: domain.name,
            birthdate: domain.birthdate,
        }
    }

    /// Profile plus the baby's age on `today`
    pub fn to_profile_response(domain: Option<DomainProfile>, today: NaiveDate) -> ProfileResponse {
        let age_days = domain.as_ref().and_then(|p| p.age_days(today));
        let age_weeks = domain.as_ref().and_then(|p| p.age_weeks(today));
        ProfileResponse {
            profile: domain.map(Self::to_dto),
            age_days,
            age_weeks,
        }
    }
}
