use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use validator::ValidationErrors;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::domain::errors::translators;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) = body?;
    let command = body
        .try_into_command()
        .map_err(|errors| ApiError(translators::from_schema_validation(&errors)))?;

    state
        .auth_service
        .login(command)
        .await
        .map_err(|e| state.responder.respond(e))
        .map(|session| ApiSuccess::new(StatusCode::OK, "Login successful", session.into()))
}

/// HTTP request body for login. The password policy is not applied here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "validation::string_or_absent")]
    #[validate(required(message = "Email is required"))]
    email: Option<String>,

    #[serde(default, deserialize_with = "validation::string_or_absent")]
    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    password: Option<String>,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ValidationErrors> {
        let mut errors = validation::schema_errors(&self);
        let email = validation::email("email", self.email.as_deref(), &mut errors);

        match (email, self.password) {
            (Some(email), Some(password)) if errors.is_empty() => {
                Ok(LoginCommand { email, password })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_password_is_accepted_for_login() {
        let command = LoginRequest {
            email: Some("Jane@X.com".to_string()),
            password: Some("a".to_string()),
        }
        .try_into_command()
        .unwrap();

        assert_eq!(command.email.as_str(), "jane@x.com");
        assert_eq!(command.password, "a");
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let errors = LoginRequest {
            email: Some("jane@x.com".to_string()),
            password: Some(String::new()),
        }
        .try_into_command()
        .unwrap_err();

        let app_error = translators::from_schema_validation(&errors);
        assert_eq!(
            app_error.field_errors().unwrap()["password"],
            vec!["Password is required"]
        );
    }
}
