//! Validation stages shared by the request DTOs.
//!
//! Each stage reads a normalized value and appends its failures to a
//! `ValidationErrors`; nothing is rejected until every stage has run, so a
//! client gets all field messages at once.

use std::borrow::Cow;

use serde::Deserialize;
use serde::Deserializer;
use serde_json::Value;
use validator::Validate;
use validator::ValidationError;
use validator::ValidationErrors;

use crate::domain::user::errors::EmailError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const NAME_MAX_LENGTH: usize = 25;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Run the derived rules, keeping the failures as the starting error set.
///
/// The derive keys failures by Rust field name; they are re-keyed to the
/// camelCase names clients send.
pub fn schema_errors(request: &impl Validate) -> ValidationErrors {
    let derived = request.validate().err().unwrap_or_default();

    ValidationErrors(
        derived
            .into_errors()
            .into_iter()
            .map(|(field, kind)| (Cow::Owned(wire_name(&field)), kind))
            .collect(),
    )
}

/// `first_name` -> `firstName`
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut capitalize = false;

    for c in field.chars() {
        if c == '_' {
            capitalize = true;
        } else if capitalize {
            name.push(c.to_ascii_uppercase());
            capitalize = false;
        } else {
            name.push(c);
        }
    }

    name
}

/// Deserialize a string field, reading any other JSON type as absent.
///
/// A wrong-typed value then fails the field's `required` rule with its own
/// message instead of rejecting the whole body.
pub fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        _ => None,
    })
}

pub fn trim(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Normalize and check an email. Absence is reported by the schema rules.
pub fn email(
    field: &'static str,
    value: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<EmailAddress> {
    match EmailAddress::new(value?) {
        Ok(email) => Some(email),
        Err(EmailError::InvalidFormat(_)) => {
            errors.add(field, error("email", "Email is not valid"));
            None
        }
        Err(EmailError::TooLong { .. }) => {
            errors.add(
                field,
                error("length", "Email must be less than 100 characters"),
            );
            None
        }
    }
}

/// Password strength rules. Every failing rule adds its own message.
pub fn password_policy(field: &'static str, value: Option<&str>, errors: &mut ValidationErrors) {
    let Some(password) = value else {
        return;
    };

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.add(
            field,
            error("length", "Password must be at least 8 characters"),
        );
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.add(
            field,
            error(
                "uppercase",
                "Password must contain at least one uppercase letter",
            ),
        );
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.add(
            field,
            error(
                "lowercase",
                "Password must contain at least one lowercase letter",
            ),
        );
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.add(
            field,
            error("digit", "Password must contain at least one number"),
        );
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.add(
            field,
            error(
                "special",
                "Password must contain at least one special character",
            ),
        );
    }
}

/// Optional name change. Present values are trimmed and length-checked.
pub fn optional_name(
    field: &'static str,
    type_message: &'static str,
    length_message: &'static str,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(name) => {
            let name = name.trim();
            let length = name.chars().count();
            if length == 0 || length > NAME_MAX_LENGTH {
                errors.add(field, error("length", length_message));
                return None;
            }
            Some(name.to_string())
        }
        _ => {
            errors.add(field, error("type", type_message));
            None
        }
    }
}

pub fn role(field: &'static str, value: Option<&Value>, errors: &mut ValidationErrors) -> Option<Role> {
    let parsed = match value? {
        Value::Null => return None,
        Value::String(role) => role.parse::<Role>().ok(),
        _ => None,
    };

    if parsed.is_none() {
        errors.add(field, error("role", "Must be either ADMIN or MEMBER"));
    }
    parsed
}

pub fn flag(field: &'static str, value: Option<&Value>, errors: &mut ValidationErrors) -> Option<bool> {
    match value? {
        Value::Null => None,
        Value::Bool(flag) => Some(*flag),
        _ => {
            errors.add(field, error("type", "Must be either true or false"));
            None
        }
    }
}
