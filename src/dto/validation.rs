//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted display name.
const MAX_NAME_LENGTH: usize = 32;
/// Longest accepted chat/todo text.
const MAX_TEXT_LENGTH: usize = 500;

/// Validates that a display name is non-blank and at most 32 characters.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message =
            Some(format!("name must be at most {MAX_NAME_LENGTH} characters").into());
        return Err(err);
    }

    Ok(())
}

/// Validates that lobby chat/todo text is non-blank and reasonably sized.
pub fn validate_lobby_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("text_blank");
        err.message = Some("text must not be blank".into());
        return Err(err);
    }

    if text.chars().count() > MAX_TEXT_LENGTH {
        let mut err = ValidationError::new("text_length");
        err.message =
            Some(format!("text must be at most {MAX_TEXT_LENGTH} characters").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name_valid() {
        assert!(validate_display_name("ada").is_ok());
        assert!(validate_display_name("Grace Hopper").is_ok());
    }

    #[test]
    fn test_validate_display_name_blank() {
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
    }

    #[test]
    fn test_validate_display_name_too_long() {
        assert!(validate_display_name(&"x".repeat(33)).is_err());
        assert!(validate_display_name(&"x".repeat(32)).is_ok());
    }

    #[test]
    fn test_validate_lobby_text() {
        assert!(validate_lobby_text("hello lobby").is_ok());
        assert!(validate_lobby_text(" ").is_err());
        assert!(validate_lobby_text(&"x".repeat(501)).is_err());
    }
}
