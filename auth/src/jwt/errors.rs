use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Signing secret for {0} tokens is missing")]
    MissingSecret(&'static str),

    #[error("Access and refresh tokens must be signed with different secrets")]
    SharedSecret,

    #[error("Invalid token lifetime '{value}': {reason}")]
    InvalidTtl { value: String, reason: String },

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    /// Signature mismatch, malformed structure and expiry all land here.
    #[error("Token is invalid or expired: {0}")]
    InvalidToken(String),
}
