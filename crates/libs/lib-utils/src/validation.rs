//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a numeric setting is at least `min`.
pub fn validate_min(value: u64, min: u64, field_name: &str) -> Result<(), String> {
    if value < min {
        Err(format!("{} must be at least {}", field_name, min))
    } else {
        Ok(())
    }
}
