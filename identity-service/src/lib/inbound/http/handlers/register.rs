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
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) = body?;
    let command = body
        .try_into_command()
        .map_err(|errors| ApiError(translators::from_schema_validation(&errors)))?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(|e| state.responder.respond(e))
        .map(|session| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "Registration successful",
                session.into(),
            )
        })
}

/// HTTP request body for self-service registration (raw JSON)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "firstName", default, deserialize_with = "validation::string_or_absent")]
    #[validate(
        required(message = "First Name is required"),
        length(min = 1, max = 25, message = "First Name must be between 1 and 25 characters")
    )]
    first_name: Option<String>,

    #[serde(rename = "lastName", default, deserialize_with = "validation::string_or_absent")]
    #[validate(
        required(message = "Last Name is required"),
        length(min = 1, max = 25, message = "Last Name must be between 1 and 25 characters")
    )]
    last_name: Option<String>,

    #[serde(default, deserialize_with = "validation::string_or_absent")]
    #[validate(required(message = "Email is required"))]
    email: Option<String>,

    #[serde(default, deserialize_with = "validation::string_or_absent")]
    #[validate(required(message = "Password is required"))]
    password: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationErrors> {
        let request = Self {
            first_name: validation::trim(self.first_name),
            last_name: validation::trim(self.last_name),
            ..self
        };

        let mut errors = validation::schema_errors(&request);
        let email = validation::email("email", request.email.as_deref(), &mut errors);
        validation::password_policy("password", request.password.as_deref(), &mut errors);

        match (request.first_name, request.last_name, email, request.password) {
            (Some(first_name), Some(last_name), Some(email), Some(password))
                if errors.is_empty() =>
            {
                Ok(RegisterCommand {
                    first_name,
                    last_name,
                    email,
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}
