use std::fmt;

use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::parse_ttl;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Signing configuration for both token domains.
#[derive(Clone)]
pub struct TokenIssuerConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime, e.g. `"15m"`
    pub access_expires_in: String,
    /// Refresh token lifetime, e.g. `"7d"`
    pub refresh_expires_in: String,
}

impl fmt::Debug for TokenIssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuerConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_expires_in", &self.access_expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .finish()
    }
}

/// Access/refresh pair produced for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session token issuer.
///
/// Holds two independent signing domains: short-lived access tokens and
/// long-lived refresh tokens. A token signed in one domain never verifies in
/// the other.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new issuer.
    ///
    /// # Errors
    /// * `MissingSecret` - A secret is empty
    /// * `SharedSecret` - Both domains were given the same secret
    /// * `InvalidTtl` - A lifetime string cannot be parsed
    pub fn new(config: &TokenIssuerConfig) -> Result<Self, JwtError> {
        if config.access_secret.is_empty() {
            return Err(JwtError::MissingSecret("access"));
        }
        if config.refresh_secret.is_empty() {
            return Err(JwtError::MissingSecret("refresh"));
        }
        if config.access_secret == config.refresh_secret {
            return Err(JwtError::SharedSecret);
        }

        Ok(Self {
            access: JwtHandler::new(config.access_secret.as_bytes()),
            refresh: JwtHandler::new(config.refresh_secret.as_bytes()),
            access_ttl: parse_ttl(&config.access_expires_in)?,
            refresh_ttl: parse_ttl(&config.refresh_expires_in)?,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Sign `payload` once per domain.
    ///
    /// # Errors
    /// * `EncodingFailed` - Either signature could not be produced
    pub fn generate_tokens<T: Serialize>(&self, payload: &T) -> Result<GeneratedTokens, JwtError> {
        let access_token = self
            .access
            .encode(&Claims::issue(payload, self.access_ttl))?;
        let refresh_token = self
            .refresh
            .encode(&Claims::issue(payload, self.refresh_ttl))?;

        Ok(GeneratedTokens {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token's signature and expiry.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, malformed or expired
    pub fn verify_access_token<T: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<Claims<T>, JwtError> {
        self.access.decode(token)
    }

    /// Verify a refresh token's signature and expiry.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, malformed or expired
    pub fn verify_refresh_token<T: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<Claims<T>, JwtError> {
        self.refresh.decode(token)
    }

    /// Read claims without checking the signature.
    ///
    /// Bookkeeping only (e.g. reading `exp` of a token this issuer just
    /// produced). Never authorize a request with the result.
    pub fn decode_token<T: DeserializeOwned>(&self, token: &str) -> Option<Claims<T>> {
        self.refresh.decode_unverified(token).ok()
    }
}
