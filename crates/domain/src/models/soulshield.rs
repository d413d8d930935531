//! SoulShield content filtering.
//!
//! Channels carry content tags drawn from a fixed category list. A viewer
//! picks a preset (optionally topped up with extra categories) and channels
//! carrying any blocked tag are hidden from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use validator::ValidationError;

/// A content category a channel can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Violence,
    Profanity,
    SexualContent,
    SubstanceUse,
    Horror,
    Gambling,
    Politics,
    MatureThemes,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 8] = [
        ContentCategory::Violence,
        ContentCategory::Profanity,
        ContentCategory::SexualContent,
        ContentCategory::SubstanceUse,
        ContentCategory::Horror,
        ContentCategory::Gambling,
        ContentCategory::Politics,
        ContentCategory::MatureThemes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Violence => "violence",
            ContentCategory::Profanity => "profanity",
            ContentCategory::SexualContent => "sexual_content",
            ContentCategory::SubstanceUse => "substance_use",
            ContentCategory::Horror => "horror",
            ContentCategory::Gambling => "gambling",
            ContentCategory::Politics => "politics",
            ContentCategory::MatureThemes => "mature_themes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentCategory::Violence => "Violence",
            ContentCategory::Profanity => "Strong language",
            ContentCategory::SexualContent => "Sexual content",
            ContentCategory::SubstanceUse => "Drugs & alcohol",
            ContentCategory::Horror => "Horror & gore",
            ContentCategory::Gambling => "Gambling",
            ContentCategory::Politics => "Politics",
            ContentCategory::MatureThemes => "Mature themes",
        }
    }
}

impl FromStr for ContentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown content category: {}", s))
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named filtering presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShieldPreset {
    #[default]
    Off,
    Gentle,
    Family,
    Strict,
}

impl ShieldPreset {
    pub const ALL: [ShieldPreset; 4] = [
        ShieldPreset::Off,
        ShieldPreset::Gentle,
        ShieldPreset::Family,
        ShieldPreset::Strict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShieldPreset::Off => "off",
            ShieldPreset::Gentle => "gentle",
            ShieldPreset::Family => "family",
            ShieldPreset::Strict => "strict",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShieldPreset::Off => "Show everything",
            ShieldPreset::Gentle => "Hide explicit and frightening content",
            ShieldPreset::Family => "Safe for shared screens and younger viewers",
            ShieldPreset::Strict => "Hide every tagged category",
        }
    }

    /// Categories this preset blocks.
    pub fn blocked(&self) -> &'static [ContentCategory] {
        use ContentCategory::*;
        match self {
            ShieldPreset::Off => &[],
            ShieldPreset::Gentle => &[SexualContent, Horror],
            ShieldPreset::Family => &[
                Violence,
                Profanity,
                SexualContent,
                SubstanceUse,
                Horror,
                Gambling,
            ],
            ShieldPreset::Strict => &ContentCategory::ALL,
        }
    }
}

impl FromStr for ShieldPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(ShieldPreset::Off),
            "gentle" => Ok(ShieldPreset::Gentle),
            "family" => Ok(ShieldPreset::Family),
            "strict" => Ok(ShieldPreset::Strict),
            _ => Err(format!("Invalid SoulShield preset: {}", s)),
        }
    }
}

impl fmt::Display for ShieldPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Union of the preset's categories and any custom ones.
pub fn effective_blocklist(
    preset: ShieldPreset,
    custom: &[ContentCategory],
) -> BTreeSet<ContentCategory> {
    preset
        .blocked()
        .iter()
        .copied()
        .chain(custom.iter().copied())
        .collect()
}

/// True unless one of `content_tags` is blocked.
///
/// Tags that are not known categories never block anything.
pub fn is_content_allowed<S: AsRef<str>>(
    content_tags: &[S],
    blocked: &BTreeSet<ContentCategory>,
) -> bool {
    blocked_tags(content_tags, blocked).is_empty()
}

/// The subset of `content_tags` that `blocked` rejects.
pub fn blocked_tags<S: AsRef<str>>(
    content_tags: &[S],
    blocked: &BTreeSet<ContentCategory>,
) -> Vec<ContentCategory> {
    content_tags
        .iter()
        .filter_map(|t| t.as_ref().parse::<ContentCategory>().ok())
        .filter(|c| blocked.contains(c))
        .collect()
}

/// Validator for lists of category strings.
pub fn validate_categories(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().all(|t| t.parse::<ContentCategory>().is_ok()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("content_category");
        err.message = Some("Unknown content category".into());
        Err(err)
    }
}

/// Parses already-validated category strings, dropping unknown ones.
pub fn parse_categories<S: AsRef<str>>(tags: &[S]) -> Vec<ContentCategory> {
    tags.iter()
        .filter_map(|t| t.as_ref().parse().ok())
        .collect()
}

/// A viewer's stored SoulShield settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldSettings {
    pub preset: ShieldPreset,
    pub custom: Vec<ContentCategory>,
}

impl ShieldSettings {
    pub fn blocklist(&self) -> BTreeSet<ContentCategory> {
        effective_blocklist(self.preset, &self.custom)
    }
}

/// Category entry in the presets response.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: ContentCategory,
    pub label: &'static str,
}

/// Preset entry in the presets response.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    pub id: ShieldPreset,
    pub description: &'static str,
    pub blocks: Vec<ContentCategory>,
}

/// Response for GET /api/soulshield/presets.
#[derive(Debug, Clone, Serialize)]
pub struct PresetsResponse {
    pub categories: Vec<CategoryInfo>,
    pub presets: Vec<PresetInfo>,
}

impl PresetsResponse {
    pub fn catalogue() -> Self {
        Self {
            categories: ContentCategory::ALL
                .into_iter()
                .map(|c| CategoryInfo {
                    id: c,
                    label: c.label(),
                })
                .collect(),
            presets: ShieldPreset::ALL
                .into_iter()
                .map(|p| PresetInfo {
                    id: p,
                    description: p.description(),
                    blocks: p.blocked().to_vec(),
                })
                .collect(),
        }
    }
}

/// Request body for POST /api/soulshield/check.
#[derive(Debug, Clone, Deserialize)]
pub struct ShieldCheckRequest {
    pub tags: Vec<String>,
    #[serde(default)]
    pub preset: ShieldPreset,
    #[serde(default)]
    pub custom: Vec<ContentCategory>,
}

/// Response for POST /api/soulshield/check.
#[derive(Debug, Clone, Serialize)]
pub struct ShieldCheckResponse {
    pub allowed: bool,
    pub blocked_tags: Vec<ContentCategory>,
}

/// Request body for PUT /api/me/soulshield.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShieldRequest {
    pub preset: ShieldPreset,
    #[serde(default)]
    pub custom: Vec<ContentCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip_strings() {
        for c in ContentCategory::ALL {
            assert_eq!(c.as_str().parse::<ContentCategory>().unwrap(), c);
        }
        assert!("cute_animals".parse::<ContentCategory>().is_err());
    }

    #[test]
    fn test_off_blocks_nothing() {
        let blocked = effective_blocklist(ShieldPreset::Off, &[]);
        assert!(blocked.is_empty());
        assert!(is_content_allowed(&["violence", "horror"], &blocked));
    }

    #[test]
    fn test_strict_blocks_every_category() {
        let blocked = effective_blocklist(ShieldPreset::Strict, &[]);
        assert_eq!(blocked.len(), ContentCategory::ALL.len());
        assert!(!is_content_allowed(&["politics"], &blocked));
    }

    #[test]
    fn test_family_preset() {
        let blocked = effective_blocklist(ShieldPreset::Family, &[]);
        assert!(!is_content_allowed(&["profanity"], &blocked));
        assert!(is_content_allowed(&["politics"], &blocked));
        assert!(is_content_allowed::<&str>(&[], &blocked));
    }

    #[test]
    fn test_custom_categories_extend_preset() {
        let blocked = effective_blocklist(ShieldPreset::Gentle, &[ContentCategory::Politics]);
        assert!(!is_content_allowed(&["politics"], &blocked));
        assert!(!is_content_allowed(&["horror"], &blocked));
        assert!(is_content_allowed(&["violence"], &blocked));
    }

    #[test]
    fn test_unknown_tags_never_block() {
        let blocked = effective_blocklist(ShieldPreset::Strict, &[]);
        assert!(is_content_allowed(&["lofi", "chill"], &blocked));
    }

    #[test]
    fn test_blocked_tags_reports_offenders() {
        let blocked = effective_blocklist(ShieldPreset::Gentle, &[]);
        let hits = blocked_tags(&["horror", "music", "sexual_content"], &blocked);
        assert_eq!(
            hits,
            vec![ContentCategory::Horror, ContentCategory::SexualContent]
        );
    }

    #[test]
    fn test_validate_categories() {
        assert!(validate_categories(&["horror".to_string()]).is_ok());
        assert!(validate_categories(&[]).is_ok());
        assert!(validate_categories(&["horror".to_string(), "nope".to_string()]).is_err());
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("Family".parse::<ShieldPreset>().unwrap(), ShieldPreset::Family);
        assert!("max".parse::<ShieldPreset>().is_err());
    }

    #[test]
    fn test_catalogue_shape() {
        let catalogue = PresetsResponse::catalogue();
        assert_eq!(catalogue.categories.len(), 8);
        assert_eq!(catalogue.presets.len(), 4);
        let json = serde_json::to_value(&catalogue).unwrap();
        assert_eq!(json["presets"][2]["id"], "family");
        assert_eq!(json["categories"][2]["id"], "sexual_content");
    }
}
