use validator::ValidationErrors;

use super::AppError;
use super::FieldErrors;
use crate::domain::user::errors::StoreError;

/// Flatten request validation failures into `{field: [messages...]}`.
pub fn from_schema_validation(errors: &ValidationErrors) -> AppError {
    let field_errors: FieldErrors = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let field = field.to_string();
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
                .collect();
            (field, messages)
        })
        .collect();

    AppError::validation(field_errors)
}

/// Map a recognized storage failure to its client-facing shape.
///
/// Returns `None` for failures the storage layer could not classify; those
/// fall through to generic internal handling.
pub fn from_storage_constraint(error: &StoreError) -> Option<AppError> {
    match error {
        StoreError::UniqueViolation { field } if field == "email" => {
            Some(AppError::email_unavailable())
        }
        StoreError::UniqueViolation { field } => Some(AppError::invalid_field(
            field.clone(),
            "This value is already in use",
        )),
        StoreError::RecordNotFound => Some(AppError::NotFound("Resource not found".to_string())),
        StoreError::Rejected { code, .. } => {
            Some(AppError::BadRequest(format!("Database error ({})", code)))
        }
        StoreError::InvalidRecord(_) | StoreError::Unavailable(_) => None,
    }
}
