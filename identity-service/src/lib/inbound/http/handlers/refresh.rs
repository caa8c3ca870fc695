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
use crate::domain::user::models::RefreshCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation;

pub async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) = body?;
    let command = body
        .try_into_command()
        .map_err(|errors| ApiError(translators::from_schema_validation(&errors)))?;

    state
        .auth_service
        .refresh(command)
        .await
        .map_err(|e| state.responder.respond(e))
        .map(|session| {
            ApiSuccess::new(StatusCode::OK, "Token refreshed successfully", session.into())
        })
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken", default, deserialize_with = "validation::string_or_absent")]
    #[validate(
        required(message = "Refresh token is required"),
        length(min = 1, message = "Refresh token is required")
    )]
    refresh_token: Option<String>,
}

impl RefreshRequest {
    fn try_into_command(self) -> Result<RefreshCommand, ValidationErrors> {
        let errors = validation::schema_errors(&self);

        match self.refresh_token {
            Some(refresh_token) if errors.is_empty() => Ok(RefreshCommand { refresh_token }),
            _ => Err(errors),
        }
    }
}
