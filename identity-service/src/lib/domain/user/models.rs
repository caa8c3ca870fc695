use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// `password_hash` never leaves the domain: outward-facing code works with
/// [`UserProfile`].
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Password-free projection of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// Public view of a user. Has no password field by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Role for a user about to be inserted next to `existing_users` others.
    ///
    /// The very first user is always ADMIN. Must be evaluated inside the same
    /// atomic operation that counts and inserts.
    pub fn for_new_user(existing_users: u64, requested: Option<Role>) -> Role {
        if existing_users == 0 {
            Role::Admin
        } else {
            requested.unwrap_or(Role::Member)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MEMBER" => Ok(Role::Member),
            other => Err(RoleError(other.to_string())),
        }
    }
}

/// Email address type
///
/// Trimmed and lower-cased on construction, so comparisons are
/// case-insensitive. Validated with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const MAX_LENGTH: usize = 100;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `TooLong` - Longer than 100 characters
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let email = email.as_ref().trim().to_lowercase();

        email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted session-continuation record.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshToken {
    /// Whether this record can still back a refresh at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .field("revoked", &self.revoked)
            .finish_non_exhaustive()
    }
}

/// A user together with their refresh token history.
#[derive(Debug, Clone)]
pub struct UserWithRefreshTokens {
    pub user: User,
    pub refresh_tokens: Vec<RefreshToken>,
}

/// Fields for the atomic create. The role is decided by the store.
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    /// Role to grant when this is not the first user
    pub requested_role: Option<Role>,
    pub is_active: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("requested_role", &self.requested_role)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// Fields for a new refresh token record.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserProfile> for TokenPayload {
    fn from(user: &UserProfile) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
        }
    }
}

/// Outcome of a successful registration, login or refresh.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Self-service registration with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password: String,
}

/// Login attempt.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

/// Exchange of a refresh token for a new session.
#[derive(Debug)]
pub struct RefreshCommand {
    pub refresh_token: String,
}

/// Administrator-assisted user creation.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password: String,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Administrator edit of an existing user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUserCommand {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }
}
