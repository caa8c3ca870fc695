use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Signed token claims.
///
/// Wraps a service-defined payload with the registered claims every token
/// carries. The payload fields are flattened into the token body, so a
/// payload `{ "userId": .. }` produces `{ "userId": .., "iat": .., "exp": .., "jti": .. }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims<T> {
    /// Service-defined payload
    #[serde(flatten)]
    pub payload: T,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID, unique per issued token
    pub jti: String,
}

impl<T> Claims<T> {
    /// Create claims issued now that expire after `ttl`.
    pub fn issue(payload: T, ttl: Duration) -> Self {
        Self::issued_at(payload, Utc::now(), ttl)
    }

    /// Create claims with an explicit issue time.
    ///
    /// # Arguments
    /// * `payload` - Service payload
    /// * `now` - Issue time
    /// * `ttl` - Time to live, added to `now` to produce `exp`
    pub fn issued_at(payload: T, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            payload,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Absolute expiry time, if `exp` is representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
