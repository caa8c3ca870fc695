use serde_json::Value;

use super::handlers::ApiError;
use crate::config::Environment;
use crate::domain::errors::translators;
use crate::domain::errors::AppError;
use crate::domain::errors::Meta;
use crate::user::errors::AuthError;

/// Terminal boundary turning any service failure into one taxonomy shape.
#[derive(Debug, Clone, Copy)]
pub struct ErrorResponder {
    environment: Environment,
}

impl ErrorResponder {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Resolve a failure into its client-facing form.
    ///
    /// Storage translation is tried first, then classified errors pass
    /// through, and anything else becomes Internal. Production hides the
    /// original message of an Internal error.
    pub fn resolve(&self, error: AuthError) -> AppError {
        if let AuthError::Store(store_error) = &error {
            if let Some(app_error) = translators::from_storage_constraint(store_error) {
                tracing::debug!(error = %store_error, code = app_error.code(), "Storage error translated");
                return app_error;
            }
        }

        if let AuthError::App(app_error) = error {
            if app_error.status().is_server_error() {
                tracing::error!(code = app_error.code(), message = %app_error, "Request failed");
            } else if !self.environment.is_production() {
                tracing::debug!(code = app_error.code(), message = %app_error, "Request rejected");
            }
            return app_error;
        }

        tracing::error!(error = %error, "Unhandled error");

        if self.environment.is_production() {
            return AppError::internal();
        }

        let mut meta = Meta::new();
        meta.insert("error".to_string(), Value::String(format!("{:?}", error)));

        AppError::Internal {
            message: error.to_string(),
            meta: Some(meta),
        }
    }

    pub fn respond(&self, error: impl Into<AuthError>) -> ApiError {
        ApiError(self.resolve(error.into()))
    }
}
