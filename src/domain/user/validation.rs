//! User validation utilities
//!
//! These checks run at the request boundary. Everything past it (the
//! service, the repositories and the search) assumes its input already
//! passed them.

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("Login cannot be empty")]
    EmptyLogin,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password contains invalid character: '{0}'. Only alphanumeric characters are allowed")]
    InvalidPasswordCharacter(char),

    #[error("Age must be between {min} and {max}, got {actual}")]
    AgeOutOfRange { min: u8, max: u8, actual: i64 },

    #[error("Limit must be a positive integer")]
    InvalidLimit,
}

const MAX_USER_ID_LENGTH: usize = 64;
pub const MIN_AGE: u8 = 4;
pub const MAX_AGE: u8 = 130;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only ASCII alphanumeric characters and hyphens
///
/// Both generated UUIDs and short externally supplied ids (`"777"`) pass.
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    if let Some(c) = id.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(UserValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}

/// Validate a login. Any non-empty string is accepted.
pub fn validate_login(login: &str) -> Result<(), UserValidationError> {
    if login.is_empty() {
        return Err(UserValidationError::EmptyLogin);
    }

    Ok(())
}

/// Validate a plaintext password: non-empty, ASCII alphanumeric only
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    if let Some(c) = password.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(UserValidationError::InvalidPasswordCharacter(c));
    }

    Ok(())
}

/// Validate an age and narrow it to the stored representation
pub fn validate_age(age: i64) -> Result<u8, UserValidationError> {
    let out_of_range = UserValidationError::AgeOutOfRange {
        min: MIN_AGE,
        max: MAX_AGE,
        actual: age,
    };

    match u8::try_from(age) {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Ok(age),
        _ => Err(out_of_range),
    }
}

/// Validate a search limit
pub fn validate_limit(limit: u64) -> Result<usize, UserValidationError> {
    if limit == 0 {
        return Err(UserValidationError::InvalidLimit);
    }

    usize::try_from(limit).map_err(|_| UserValidationError::InvalidLimit)
}
