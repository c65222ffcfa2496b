// Validation utilities module
// Provides custom validation functions for domain-specific rules

use validator::ValidationError;

/// Validates that a username is non-blank and contains only ASCII
/// letters, digits, '.', '_' or '-'
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::new("username_empty"));
    }

    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username_invalid_characters"))
    }
}

/// Validates that a person name is not blank when provided
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::new("name_blank"))
    } else {
        Ok(())
    }
}
