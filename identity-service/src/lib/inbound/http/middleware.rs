use auth::Claims;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::errors::AppError;
use crate::domain::user::models::Role;
use crate::domain::user::models::TokenPayload;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

fn unauthorized() -> Response {
    ApiError(AppError::Unauthorized(
        AppError::INVALID_ACCESS_TOKEN.to_string(),
    ))
    .into_response()
}

/// Middleware that validates access tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).ok_or_else(|| {
        tracing::debug!("Missing or malformed Authorization header");
        unauthorized()
    })?;

    let claims: Claims<TokenPayload> =
        state.token_issuer.verify_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            unauthorized()
        })?;

    let user_id = UserId::from_string(&claims.payload.user_id).map_err(|e| {
        tracing::warn!(error = %e, "Signed access token carries an invalid user id");
        unauthorized()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.payload.email,
        role: claims.payload.role,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
