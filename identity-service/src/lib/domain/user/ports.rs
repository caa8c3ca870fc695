use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewRefreshToken;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RefreshCommand;
use crate::domain::user::models::RefreshToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::models::UserWithRefreshTokens;
use crate::user::errors::AuthError;
use crate::user::errors::StoreError;

/// Port for credential lifecycle operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and open a session for them.
    ///
    /// # Arguments
    /// * `command` - Validated registration fields
    ///
    /// # Returns
    /// Password-free user projection with a freshly issued token pair
    ///
    /// # Errors
    /// * `App(Validation)` - Email cannot be used
    /// * `Store` - Storage failure, including a lost uniqueness race
    /// * `Password` / `Token` - Hashing or signing failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError>;

    /// Authenticate with email and password.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Password-free user projection with a freshly issued token pair
    ///
    /// # Errors
    /// * `App(Unauthorized)` - Unknown email, inactive user or wrong password
    /// * `Store` - Storage failure
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError>;

    /// Exchange a refresh token for a new token pair.
    ///
    /// # Errors
    /// * `App(Unauthorized)` - Token invalid, unknown, revoked or expired, or
    ///   its owner is missing or inactive
    /// * `Store` - Storage failure
    async fn refresh(&self, command: RefreshCommand) -> Result<AuthSession, AuthError>;

    /// Create a user on behalf of an administrator. No session is opened.
    ///
    /// # Errors
    /// * `App(Validation)` - Email cannot be used
    /// * `Store` - Storage failure
    async fn create_user(&self, command: CreateUserCommand) -> Result<UserProfile, AuthError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `Store(RecordNotFound)` - No user with this id
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, AuthError>;

    /// Apply an administrator edit to an existing user.
    ///
    /// # Errors
    /// * `Store(RecordNotFound)` - No user with this id
    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<UserProfile, AuthError>;

    /// Delete a user together with their refresh tokens.
    ///
    /// # Errors
    /// * `Store(RecordNotFound)` - No user with this id
    async fn delete_user(&self, id: &UserId) -> Result<(), AuthError>;
}

/// Persistence of users and refresh tokens.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by normalized email.
    async fn find_user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;

    /// Retrieve user by identifier.
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Number of users currently stored.
    async fn count_users(&self) -> Result<u64, StoreError>;

    /// Count users, decide the role and insert, as one linearizable step.
    ///
    /// Under K concurrent calls against an empty store exactly one caller
    /// observes a count of zero and receives ADMIN.
    ///
    /// # Arguments
    /// * `user` - Fields for the new user
    ///
    /// # Returns
    /// Committed user with its assigned role
    ///
    /// # Errors
    /// * `UniqueViolation` - Email already stored
    /// * `Rejected` / `Unavailable` - Storage failure
    async fn create_user_atomic(&self, user: NewUser) -> Result<User, StoreError>;

    /// Overwrite the fields present in `changes` and bump `updated_at`.
    ///
    /// # Errors
    /// * `RecordNotFound` - No user with this id
    async fn update_user(
        &self,
        id: &UserId,
        changes: UpdateUserCommand,
    ) -> Result<User, StoreError>;

    /// Remove a user. Their refresh tokens go with them.
    ///
    /// # Errors
    /// * `RecordNotFound` - No user with this id
    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError>;

    /// Append a refresh token record.
    ///
    /// # Errors
    /// * `Rejected` - Owning user does not exist
    /// * `UniqueViolation` - Token string already recorded
    async fn create_refresh_token(
        &self,
        token: NewRefreshToken,
    ) -> Result<RefreshToken, StoreError>;

    /// Retrieve a refresh token record by its token string.
    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Retrieve user by email together with their refresh token history.
    async fn find_user_with_refresh_tokens(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserWithRefreshTokens>, StoreError>;
}
