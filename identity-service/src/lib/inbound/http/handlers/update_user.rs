use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use validator::ValidationErrors;

use super::require_admin;
use super::user_id_from_path;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::errors::translators;
use crate::domain::errors::AppError;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation;

pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    require_admin(&caller)?;
    let user_id = user_id_from_path(&state, &id)?;

    let Json(body) = body?;
    let command = body.try_into_command().map_err(ApiError)?;

    state
        .auth_service
        .update_user(&user_id, command)
        .await
        .map_err(|e| state.responder.respond(e))
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "User updated successfully", user.into()))
}

/// HTTP request body for an administrator edit (raw JSON)
///
/// Email and password are not editable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "firstName")]
    first_name: Option<Value>,

    #[serde(rename = "lastName")]
    last_name: Option<Value>,

    role: Option<Value>,

    #[serde(rename = "isActive")]
    is_active: Option<Value>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, AppError> {
        let mut errors = ValidationErrors::new();

        let command = UpdateUserCommand {
            first_name: validation::optional_name(
                "firstName",
                "First Name is required",
                "First Name must be between 1 and 25 characters",
                self.first_name.as_ref(),
                &mut errors,
            ),
            last_name: validation::optional_name(
                "lastName",
                "Last Name is required",
                "Last Name must be between 1 and 25 characters",
                self.last_name.as_ref(),
                &mut errors,
            ),
            role: validation::role("role", self.role.as_ref(), &mut errors),
            is_active: validation::flag("isActive", self.is_active.as_ref(), &mut errors),
        };

        if !errors.is_empty() {
            return Err(translators::from_schema_validation(&errors));
        }
        if command.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::user::models::Role;

    fn parse(body: Value) -> Result<UpdateUserCommand, AppError> {
        serde_json::from_value::<UpdateUserRequest>(body)
            .unwrap()
            .try_into_command()
    }

    #[test]
    fn test_partial_update() {
        let command = parse(json!({ "lastName": " Roe ", "role": "ADMIN" })).unwrap();

        assert_eq!(
            command,
            UpdateUserCommand {
                last_name: Some("Roe".to_string()),
                role: Some(Role::Admin),
                ..UpdateUserCommand::default()
            }
        );
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert_eq!(
            parse(json!({})).unwrap_err(),
            AppError::BadRequest("No fields to update".to_string())
        );
        assert_eq!(
            parse(json!({ "firstName": null })).unwrap_err(),
            AppError::BadRequest("No fields to update".to_string())
        );
    }

    #[test]
    fn test_mistyped_fields_are_reported_per_field() {
        let error = parse(json!({ "firstName": 7, "isActive": "yes", "role": "ROOT" })).unwrap_err();
        let field_errors = error.field_errors().unwrap();

        assert_eq!(field_errors["firstName"], vec!["First Name is required"]);
        assert_eq!(field_errors["isActive"], vec!["Must be either true or false"]);
        assert_eq!(field_errors["role"], vec!["Must be either ADMIN or MEMBER"]);
    }
}
