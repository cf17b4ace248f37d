use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 50;
const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*";

pub type UserId = Uuid;

/// Public view of an account; the password hash never leaves the store layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UserNameParseError {
    #[error("Username is required.")]
    Empty,
    #[error("Username must be at least 3 characters long.")]
    TooShort,
    #[error("Username must be at most 20 characters long.")]
    TooLong,
}

impl UserName {
    pub fn parse(input: &str) -> Result<Self, UserNameParseError> {
        let len = input.chars().count();
        if input.trim().is_empty() {
            return Err(UserNameParseError::Empty);
        }
        if len < MIN_USERNAME_LENGTH {
            return Err(UserNameParseError::TooShort);
        }
        if len > MAX_USERNAME_LENGTH {
            return Err(UserNameParseError::TooLong);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct UserPassword(String);

// Keep the plaintext out of logs and panics
impl std::fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UserPassword(***)")
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UserPasswordParseError {
    #[error("Password is required.")]
    Empty,
    #[error("Password must be at least 6 characters long.")]
    TooShort,
    #[error("Password must be at most 50 characters long.")]
    TooLong,
    #[error(
        "Password must include at least one letter, one number, and one special character (!@#$%^&*)."
    )]
    TooWeak,
}

impl UserPassword {
    pub fn parse(input: &str) -> Result<Self, UserPasswordParseError> {
        let len = input.chars().count();
        if input.is_empty() {
            return Err(UserPasswordParseError::Empty);
        }
        if len < MIN_PASSWORD_LENGTH {
            return Err(UserPasswordParseError::TooShort);
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(UserPasswordParseError::TooLong);
        }

        let has_letter = input.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = input.chars().any(|c| c.is_ascii_digit());
        let has_special = input.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));
        if !(has_letter && has_digit && has_special) {
            return Err(UserPasswordParseError::TooWeak);
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
