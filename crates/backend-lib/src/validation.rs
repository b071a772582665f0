// ============================
// crates/backend-lib/src/validation.rs
// ============================
//! Input validation for signup and login requests.

use crate::error::AppError;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// Maximum email length, RFC 5321 SMTP limit
pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Validate the credential fields of a signup or login request.
///
/// Both fields must be present; the check happens here rather than at
/// deserialization so the caller gets the same failure shape either way.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    validate_email(email)?;
    validate_password(password)
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::Validation(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(AppError::Validation(
            "Email address is not valid".to_string(),
        ));
    }
    Ok(())
}

/// Validate a password against the length bounds.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Lowercase an email for uniqueness checks and lookups.
///
/// Storage keeps the address as the user typed it; comparisons are
/// case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
