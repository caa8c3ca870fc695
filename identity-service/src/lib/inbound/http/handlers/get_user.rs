use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::require_admin;
use super::user_id_from_path;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    require_admin(&caller)?;
    let user_id = user_id_from_path(&state, &id)?;

    state
        .auth_service
        .get_user(&user_id)
        .await
        .map_err(|e| state.responder.respond(e))
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "User retrieved successfully", user.into()))
}
