use std::collections::BTreeMap;

use http::StatusCode;
use thiserror::Error;

pub mod translators;

/// Field name to ordered list of messages, for inline form display.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Safe key/value data attached to an error. Never carries secrets.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Classified, safe-to-display failure.
///
/// Closed set: every failure that reaches a client is one of these kinds,
/// each with a fixed status and machine code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: FieldErrors,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Conflict { message: String, meta: Option<Meta> },

    #[error("{message}")]
    Internal { message: String, meta: Option<Meta> },
}

impl AppError {
    pub const VALIDATION_MESSAGE: &'static str = "Validation Error";
    pub const INTERNAL_MESSAGE: &'static str = "Internal Server Error";
    pub const INVALID_CREDENTIALS: &'static str = "Invalid credentials";
    pub const INVALID_REFRESH_TOKEN: &'static str = "Invalid or expired refresh token";
    pub const INVALID_ACCESS_TOKEN: &'static str = "Invalid or expired token";
    pub const EMAIL_UNAVAILABLE: &'static str = "Unable to use this email address";

    /// Validation failure with the given per-field messages.
    pub fn validation(field_errors: FieldErrors) -> Self {
        AppError::Validation {
            message: Self::VALIDATION_MESSAGE.to_string(),
            field_errors,
        }
    }

    /// Validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.insert(field.into(), vec![message.into()]);
        Self::validation(field_errors)
    }

    /// The one message used for every "this email cannot be used" outcome.
    pub fn email_unavailable() -> Self {
        Self::invalid_field("email", Self::EMAIL_UNAVAILABLE)
    }

    /// The one message used for every failed login, whatever the cause.
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized(Self::INVALID_CREDENTIALS.to_string())
    }

    pub fn internal() -> Self {
        AppError::Internal {
            message: Self::INTERNAL_MESSAGE.to_string(),
            meta: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::Internal { .. } => "INTERNAL",
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    pub fn meta(&self) -> Option<&Meta> {
        match self {
            AppError::Conflict { meta, .. } | AppError::Internal { meta, .. } => meta.as_ref(),
            _ => None,
        }
    }
}
