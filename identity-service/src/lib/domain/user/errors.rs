use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

use crate::domain::errors::AppError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct RoleError(pub String);

/// Storage failures, classified by the store implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unique constraint violated on field '{field}'")]
    UniqueViolation { field: String },

    #[error("Record to mutate was not found")]
    RecordNotFound,

    /// A storage error with a recognized error code.
    #[error("Storage rejected the operation ({code}): {detail}")]
    Rejected { code: String, detail: String },

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for registration, login and session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Business-rule failure, already in client-facing form
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
