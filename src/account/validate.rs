use std::collections::HashSet;
use thiserror::Error;

pub const MAX_USERNAME_LEN: usize = 32;

/// Why a username was rejected. The display text doubles as the translation key.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username cannot be empty.")]
    Empty,

    #[error("Username cannot be longer than 32 characters.")]
    TooLong,

    #[error("Username cannot contain special characters or uppercase letters.")]
    InvalidCharacters,

    #[error("This username is already in use.")]
    AlreadyInUse,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password cannot be empty.")]
    Empty,

    #[error("Passwords do not match.")]
    Mismatch,
}

fn is_username_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-')
}

/// Checks a username against the account naming rules, first failure wins.
pub fn validate_username(input: &str, existing: &HashSet<String>) -> Result<(), UsernameError> {
    if input.is_empty() {
        return Err(UsernameError::Empty);
    }

    if input.chars().count() > MAX_USERNAME_LEN {
        return Err(UsernameError::TooLong);
    }

    if !input.chars().all(is_username_char) {
        return Err(UsernameError::InvalidCharacters);
    }

    if existing.contains(input) {
        return Err(UsernameError::AlreadyInUse);
    }

    Ok(())
}

pub fn validate_password(password: &str, confirmation: &str) -> Result<(), PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    if password != confirmation {
        return Err(PasswordError::Mismatch);
    }

    Ok(())
}
