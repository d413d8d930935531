//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-z0-9_]{3,30}$").unwrap();
}

/// Validates that a string is not only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a URL uses http or https.
///
/// Image and page URLs end up in `src`/`href` attributes on the client, so
/// other schemes (`javascript:`, `data:`) are refused.
pub fn validate_web_url(value: &str) -> Result<(), ValidationError> {
    let lower = value.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => {
            let mut err = ValidationError::new("web_url");
            err.message = Some("Must be an http(s) URL".into());
            Err(err)
        }
    }
}

/// Validates a username: 3-30 lowercase letters, digits or underscores.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_format");
        err.message =
            Some("Username must be 3-30 lowercase letters, digits or underscores".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("x").is_ok());
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_validate_web_url() {
        assert!(validate_web_url("https://cdn.example.com/thumb.jpg").is_ok());
        assert!(validate_web_url("http://localhost:3000").is_ok());
        assert!(validate_web_url("HTTPS://Example.com").is_ok());
        assert!(validate_web_url("javascript:alert(1)").is_err());
        assert!(validate_web_url("data:image/png;base64,AAAA").is_err());
        assert!(validate_web_url("https://").is_err());
        assert!(validate_web_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("loop_fan_42").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("Has Caps").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_error_messages_present() {
        let err = validate_web_url("nope").unwrap_err();
        assert_eq!(err.code, "web_url");
        assert!(err.message.is_some());
    }
}
