//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::soulshield::{parse_categories, ShieldSettings};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub is_creator: bool,
    pub is_premium: bool,
    pub stripe_customer_id: Option<String>,
    pub soulshield_preset: String,
    pub soulshield_blocked: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileEntity {
    pub fn shield_settings(&self) -> ShieldSettings {
        ShieldSettings {
            // Column is CHECK-constrained to known presets.
            preset: self.soulshield_preset.parse().unwrap_or_default(),
            custom: parse_categories(&self.soulshield_blocked),
        }
    }
}

impl From<ProfileEntity> for domain::models::Profile {
    fn from(entity: ProfileEntity) -> Self {
        let soulshield = entity.shield_settings();
        Self {
            id: entity.id,
            email: entity.email,
            username: entity.username,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            bio: entity.bio,
            is_creator: entity.is_creator,
            is_premium: entity.is_premium,
            soulshield,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::soulshield::{ContentCategory, ShieldPreset};

    fn entity() -> ProfileEntity {
        ProfileEntity {
            id: Uuid::new_v4(),
            email: Some("viewer@example.com".to_string()),
            username: None,
            display_name: None,
            avatar_url: None,
            bio: None,
            is_creator: false,
            is_premium: true,
            stripe_customer_id: Some("cus_1".to_string()),
            soulshield_preset: "family".to_string(),
            soulshield_blocked: vec!["gambling".to_string(), "not-a-category".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_from_entity() {
        let profile: domain::models::Profile = entity().into();
        assert!(profile.is_premium);
        assert_eq!(profile.soulshield.preset, ShieldPreset::Family);
        assert_eq!(profile.soulshield.custom, vec![ContentCategory::Gambling]);
    }

    #[test]
    fn test_unknown_preset_falls_back_to_off() {
        let mut e = entity();
        e.soulshield_preset = "bogus".to_string();
        assert_eq!(e.shield_settings().preset, ShieldPreset::Off);
    }
}
