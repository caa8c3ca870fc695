use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::errors::AppError;
use crate::domain::errors::FieldErrors;
use crate::domain::errors::Meta;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::StoreError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod health;
pub mod login;
pub mod refresh;
pub mod register;
pub mod update_user;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &'static str, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status: &'static str,
    message: &'static str,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            status: "success",
            message,
            data,
        }
    }
}

/// Classified error on its way out. Always rendered in the one error shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

/// Request bodies that are not usable JSON never reach validation.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Request body rejected");

        let message = match rejection {
            JsonRejection::JsonDataError(_) => "Request body must be a JSON object",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            _ => "Malformed JSON request body",
        };
        Self(AppError::BadRequest(message.to_string()))
    }
}

/// Gate for the user administration routes.
pub(crate) fn require_admin(caller: &AuthenticatedUser) -> Result<(), ApiError> {
    if caller.role == Role::Admin {
        return Ok(());
    }

    tracing::debug!(user_id = %caller.user_id, "Rejected: caller is not an administrator");
    Err(ApiError(AppError::Forbidden(
        "Administrator role required".to_string(),
    )))
}

/// An id that cannot name a stored user is reported like a missing one.
pub(crate) fn user_id_from_path(state: &AppState, id: &str) -> Result<UserId, ApiError> {
    UserId::from_string(id).map_err(|e| {
        tracing::debug!(error = %e, "Path does not hold a user id");
        state.responder.respond(StoreError::RecordNotFound)
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody<'a> {
    status: u16,
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<&'a FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a Meta>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let body = ApiErrorBody {
            status: status.as_u16(),
            code: self.0.code(),
            message: self.0.to_string(),
            field_errors: self.0.field_errors(),
            meta: self.0.meta(),
        };

        (status, Json(body)).into_response()
    }
}

/// Outward user projection shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserProfile> for UserData {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseData {
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthSession> for SessionResponseData {
    fn from(session: AuthSession) -> Self {
        Self {
            user: (&session.user).into(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}
