//! Feedback submissions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Minimum length of a message after sanitization.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Maximum length of a message after sanitization.
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    Bug,
    Idea,
    Praise,
    #[default]
    Other,
}

impl FeedbackCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::Idea => "idea",
            FeedbackCategory::Praise => "praise",
            FeedbackCategory::Other => "other",
        }
    }
}

/// Request payload for POST /api/feedback.
///
/// The raw message is bounded here so oversized bodies are refused before
/// sanitization; the sanitized bounds are checked by the handler.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitFeedbackRequest {
    #[validate(length(max = 10000, message = "Message is too long"))]
    pub message: String,

    #[serde(default)]
    pub category: FeedbackCategory,

    #[validate(length(max = 2048, message = "Page URL is too long"))]
    pub page_url: Option<String>,
}

/// Why a sanitized message was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLengthError {
    TooShort,
    TooLong,
}

/// Checks the sanitized message against the length bounds.
pub fn check_message_length(sanitized: &str) -> Result<(), MessageLengthError> {
    let chars = sanitized.chars().count();
    if chars < MIN_MESSAGE_CHARS {
        Err(MessageLengthError::TooShort)
    } else if chars > MAX_MESSAGE_CHARS {
        Err(MessageLengthError::TooLong)
    } else {
        Ok(())
    }
}

/// Response after storing feedback.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitFeedbackResponse {
    pub id: Uuid,
    pub received: bool,
}
