use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::domain::errors::AppError;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewRefreshToken;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RefreshCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::TokenPayload;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::AuthError;
use crate::user::errors::StoreError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::CredentialStore;

/// Plaintext behind the digest that unknown-email logins are verified against.
const DUMMY_PASSWORD: &str = "no-such-account-placeholder";

/// Domain service implementation for registration, login and refresh.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    password_hasher: Arc<PasswordHasher>,
    token_issuer: Arc<TokenIssuer>,
    dummy_digest: OnceCell<String>,
}

impl<S> AuthService<S>
where
    S: CredentialStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `password_hasher` - Configured Argon2id hasher
    /// * `token_issuer` - Access and refresh token signer
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(
        store: Arc<S>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            store,
            password_hasher,
            token_issuer,
            dummy_digest: OnceCell::new(),
        }
    }

    /// Hash on the blocking pool so request tasks keep making progress.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Unexpected(format!("Password hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, hash: String, password: String) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| {
                AuthError::Unexpected(format!("Password verification task failed: {}", e))
            })?
            .map_err(AuthError::from)
    }

    /// Spend one verification on an unknown email, as a wrong password would.
    ///
    /// The digest is produced with the live parameters on first use.
    async fn verify_against_dummy(&self, password: String) -> Result<(), AuthError> {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD.to_string()))
            .await?;

        self.verify_password(digest.clone(), password).await?;
        Ok(())
    }

    async fn ensure_email_available(&self, email: &EmailAddress) -> Result<(), AuthError> {
        match self.store.find_user_by_email(email).await? {
            Some(_) => Err(AppError::email_unavailable().into()),
            None => Ok(()),
        }
    }

    /// Issue a token pair for `user` and record the refresh token.
    ///
    /// Nothing is returned unless the refresh token was durably stored.
    async fn start_session(&self, user: UserProfile) -> Result<AuthSession, AuthError> {
        let tokens = self
            .token_issuer
            .generate_tokens(&TokenPayload::from(&user))?;

        self.store_refresh_token(user.id, &tokens.refresh_token)
            .await?;

        Ok(AuthSession {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    async fn store_refresh_token(&self, user_id: UserId, token: &str) -> Result<(), AuthError> {
        let expires_at = self
            .token_issuer
            .decode_token::<TokenPayload>(token)
            .and_then(|claims| claims.expires_at())
            .ok_or_else(|| {
                AuthError::Unexpected("Issued refresh token has no readable expiry".to_string())
            })?;

        let record = self
            .store
            .create_refresh_token(NewRefreshToken {
                user_id,
                token: token.to_string(),
                expires_at,
            })
            .await?;

        tracing::debug!(
            user_id = %user_id,
            refresh_token_id = %record.id,
            expires_at = %record.expires_at,
            "Refresh token stored"
        );

        Ok(())
    }
}

fn invalid_refresh_token() -> AuthError {
    AppError::Unauthorized(AppError::INVALID_REFRESH_TOKEN.to_string()).into()
}

#[async_trait]
impl<S> AuthServicePort for AuthService<S>
where
    S: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError> {
        self.ensure_email_available(&command.email).await?;

        let password_hash = self.hash_password(command.password).await?;

        // The store rechecks uniqueness; a lost race surfaces as a unique violation.
        let user = self
            .store
            .create_user_atomic(NewUser {
                first_name: command.first_name,
                last_name: command.last_name,
                email: command.email,
                password_hash,
                requested_role: None,
                is_active: true,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        self.start_session(user.profile()).await
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError> {
        let Some(found) = self
            .store
            .find_user_with_refresh_tokens(&command.email)
            .await?
        else {
            self.verify_against_dummy(command.password).await?;
            tracing::debug!("Login rejected: unknown email");
            return Err(AppError::invalid_credentials().into());
        };

        let user = found.user;
        let password_matches = self
            .verify_password(user.password_hash.clone(), command.password)
            .await?;

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "Login rejected: inactive user");
            return Err(AppError::invalid_credentials().into());
        }

        if !password_matches {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AppError::invalid_credentials().into());
        }

        let now = Utc::now();
        tracing::info!(
            user_id = %user.id,
            refresh_tokens = found.refresh_tokens.len(),
            usable_refresh_tokens = found
                .refresh_tokens
                .iter()
                .filter(|token| token.is_usable(now))
                .count(),
            "User logged in"
        );

        self.start_session(user.profile()).await
    }

    async fn refresh(&self, command: RefreshCommand) -> Result<AuthSession, AuthError> {
        let claims: Claims<TokenPayload> = self
            .token_issuer
            .verify_refresh_token(&command.refresh_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh rejected: token verification failed");
                invalid_refresh_token()
            })?;

        let Some(record) = self
            .store
            .find_refresh_token(&command.refresh_token)
            .await?
        else {
            tracing::warn!("Refresh rejected: validly signed token is not on record");
            return Err(invalid_refresh_token());
        };

        if !record.is_usable(Utc::now()) {
            tracing::debug!(refresh_token_id = %record.id, "Refresh rejected: token revoked or expired");
            return Err(invalid_refresh_token());
        }

        if UserId::from_string(&claims.payload.user_id).ok() != Some(record.user_id) {
            tracing::warn!(refresh_token_id = %record.id, "Refresh rejected: subject mismatch");
            return Err(invalid_refresh_token());
        }

        let user = match self.store.find_user_by_id(&record.user_id).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::debug!(user_id = %record.user_id, "Refresh rejected: user missing or inactive");
                return Err(invalid_refresh_token());
            }
        };

        tracing::info!(user_id = %user.id, "Session refreshed");

        self.start_session(user.profile()).await
    }

    async fn create_user(&self, command: CreateUserCommand) -> Result<UserProfile, AuthError> {
        self.ensure_email_available(&command.email).await?;

        let password_hash = self.hash_password(command.password).await?;

        let user = self
            .store
            .create_user_atomic(NewUser {
                first_name: command.first_name,
                last_name: command.last_name,
                email: command.email,
                password_hash,
                requested_role: command.role,
                is_active: command.is_active.unwrap_or(true),
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created by administrator");

        Ok(user.profile())
    }

    async fn get_user(&self, id: &UserId) -> Result<UserProfile, AuthError> {
        self.store
            .find_user_by_id(id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| StoreError::RecordNotFound.into())
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<UserProfile, AuthError> {
        let user = self.store.update_user(id, command).await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            is_active = user.is_active,
            "User updated by administrator"
        );

        Ok(user.profile())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), AuthError> {
        self.store.delete_user(id).await?;

        tracing::info!(user_id = %id, "User deleted by administrator");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use auth::HashingParams;
    use auth::TokenIssuerConfig;
    use chrono::Duration;
    use mockall::mock;
    use uuid::Uuid;

    use super::*;
    use crate::domain::user::models::RefreshToken;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserWithRefreshTokens;

    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn find_user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;
            async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
            async fn count_users(&self) -> Result<u64, StoreError>;
            async fn create_user_atomic(&self, user: NewUser) -> Result<User, StoreError>;
            async fn update_user(&self, id: &UserId, changes: UpdateUserCommand) -> Result<User, StoreError>;
            async fn delete_user(&self, id: &UserId) -> Result<(), StoreError>;
            async fn create_refresh_token(&self, token: NewRefreshToken) -> Result<RefreshToken, StoreError>;
            async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;
            async fn find_user_with_refresh_tokens(&self, email: &EmailAddress) -> Result<Option<UserWithRefreshTokens>, StoreError>;
        }
    }

    fn test_hasher() -> Arc<PasswordHasher> {
        let params = HashingParams::development()
            .with_memory_cost_kib(8 * 1024)
            .with_time_cost(1);
        Arc::new(PasswordHasher::new(params).unwrap())
    }

    fn test_issuer() -> Arc<TokenIssuer> {
        Arc::new(
            TokenIssuer::new(&TokenIssuerConfig {
                access_secret: "test-access-secret-at-least-32-bytes!".to_string(),
                refresh_secret: "test-refresh-secret-at-least-32-bytes".to_string(),
                access_expires_in: "15m".to_string(),
                refresh_expires_in: "7d".to_string(),
            })
            .unwrap(),
        )
    }

    fn service(store: MockTestCredentialStore) -> AuthService<MockTestCredentialStore> {
        AuthService::new(Arc::new(store), test_hasher(), test_issuer())
    }

    fn committed(new_user: NewUser, role: Role) -> User {
        User {
            id: UserId::new(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role,
            is_active: new_user.is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stored(token: NewRefreshToken) -> RefreshToken {
        RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token: token.token,
            created_at: Utc::now(),
            expires_at: token.expires_at,
            revoked: false,
        }
    }

    fn existing_user(password: &str, is_active: bool) -> User {
        User {
            id: UserId::new(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: EmailAddress::new("jane@x.com").unwrap(),
            password_hash: test_hasher().hash(password).unwrap(),
            role: Role::Admin,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn register_command(email: &str) -> RegisterCommand {
        RegisterCommand {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: EmailAddress::new(email).unwrap(),
            password: "Aa1!aaaa".to_string(),
        }
    }

    fn login_command(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: EmailAddress::new(email).unwrap(),
            password: password.to_string(),
        }
    }

    fn app_error(result: Result<AuthSession, AuthError>) -> AppError {
        match result {
            Err(AuthError::App(error)) => error,
            other => panic!("expected a classified error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_user_by_email()
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_create_user_atomic()
            .withf(|user| {
                user.email.as_str() == "jane@x.com"
                    && user.password_hash.starts_with("$argon2id$")
                    && user.requested_role.is_none()
                    && user.is_active
            })
            .times(1)
            .returning(|user| Ok(committed(user, Role::Admin)));
        store
            .expect_create_refresh_token()
            .withf(|token| {
                let expected = Utc::now() + Duration::days(7);
                (token.expires_at - expected).num_seconds().abs() <= 5
            })
            .times(1)
            .returning(|token| Ok(stored(token)));

        let service = service(store);
        let session = service.register(register_command("Jane@X.com")).await.unwrap();

        assert_eq!(session.user.role, Role::Admin);
        assert_eq!(session.user.email.as_str(), "jane@x.com");

        let claims: Claims<TokenPayload> = service
            .token_issuer
            .verify_access_token(&session.access_token)
            .unwrap();
        assert_eq!(claims.payload.user_id, session.user.id.to_string());
        assert_eq!(claims.payload.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email_before_hashing() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_user_by_email()
            .times(1)
            .returning(|_| Ok(Some(existing_user("Aa1!aaaa", true))));
        store.expect_create_user_atomic().times(0);
        store.expect_create_refresh_token().times(0);

        let result = service(store).register(register_command("jane@x.com")).await;

        assert_eq!(app_error(result), AppError::email_unavailable());
    }

    #[tokio::test]
    async fn test_register_lost_uniqueness_race_is_a_store_error() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_user_by_email()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_create_user_atomic().times(1).returning(|_| {
            Err(StoreError::UniqueViolation {
                field: "email".to_string(),
            })
        });

        let result = service(store).register(register_command("jane@x.com")).await;

        assert!(matches!(
            result,
            Err(AuthError::Store(StoreError::UniqueViolation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_register_fails_when_refresh_token_cannot_be_stored() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_user_by_email()
            .returning(|_| Ok(None));
        store
            .expect_create_user_atomic()
            .returning(|user| Ok(committed(user, Role::Member)));
        store
            .expect_create_refresh_token()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection reset".to_string())));

        let result = service(store).register(register_command("jane@x.com")).await;

        assert!(matches!(
            result,
            Err(AuthError::Store(StoreError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_login_success_stores_new_refresh_token() {
        let mut store = MockTestCredentialStore::new();
        let user = existing_user("Aa1!aaaa", true);
        let user_id = user.id;

        store
            .expect_find_user_with_refresh_tokens()
            .withf(|email| email.as_str() == "jane@x.com")
            .times(1)
            .returning(move |_| {
                Ok(Some(UserWithRefreshTokens {
                    user: user.clone(),
                    refresh_tokens: Vec::new(),
                }))
            });
        store
            .expect_create_refresh_token()
            .withf(move |token| token.user_id == user_id)
            .times(1)
            .returning(|token| Ok(stored(token)));

        let session = service(store)
            .login(login_command("JANE@x.com", "Aa1!aaaa"))
            .await
            .unwrap();

        assert_eq!(session.user.id, user_id);
        assert_ne!(session.access_token, session.refresh_token);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut unknown = MockTestCredentialStore::new();
        unknown
            .expect_find_user_with_refresh_tokens()
            .returning(|_| Ok(None));
        unknown.expect_create_refresh_token().times(0);

        let mut wrong_password = MockTestCredentialStore::new();
        let user = existing_user("Aa1!aaaa", true);
        wrong_password
            .expect_find_user_with_refresh_tokens()
            .returning(move |_| {
                Ok(Some(UserWithRefreshTokens {
                    user: user.clone(),
                    refresh_tokens: Vec::new(),
                }))
            });
        wrong_password.expect_create_refresh_token().times(0);

        let mut inactive = MockTestCredentialStore::new();
        let user = existing_user("Aa1!aaaa", false);
        inactive
            .expect_find_user_with_refresh_tokens()
            .returning(move |_| {
                Ok(Some(UserWithRefreshTokens {
                    user: user.clone(),
                    refresh_tokens: Vec::new(),
                }))
            });
        inactive.expect_create_refresh_token().times(0);

        let unknown = app_error(
            service(unknown)
                .login(login_command("nobody@x.com", "anything"))
                .await,
        );
        let wrong_password = app_error(
            service(wrong_password)
                .login(login_command("jane@x.com", "wrong"))
                .await,
        );
        let inactive = app_error(
            service(inactive)
                .login(login_command("jane@x.com", "Aa1!aaaa"))
                .await,
        );

        assert_eq!(unknown, AppError::invalid_credentials());
        assert_eq!(unknown, wrong_password);
        assert_eq!(unknown, inactive);
    }

    #[tokio::test]
    async fn test_refresh_issues_new_pair() {
        let mut store = MockTestCredentialStore::new();
        let user = existing_user("Aa1!aaaa", true);
        let user_id = user.id;
        let issuer = test_issuer();
        let presented = issuer
            .generate_tokens(&TokenPayload::from(&user.profile()))
            .unwrap()
            .refresh_token;

        let record = RefreshToken {
            id: Uuid::new_v4(),
            user_id,
            token: presented.clone(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(7),
            revoked: false,
        };

        store
            .expect_find_refresh_token()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        store
            .expect_find_user_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        store
            .expect_create_refresh_token()
            .times(1)
            .returning(|token| Ok(stored(token)));

        let service = AuthService::new(Arc::new(store), test_hasher(), issuer);
        let session = service
            .refresh(RefreshCommand {
                refresh_token: presented.clone(),
            })
            .await
            .unwrap();

        assert_eq!(session.user.id, user_id);
        assert_ne!(session.refresh_token, presented);
    }

    #[tokio::test]
    async fn test_refresh_rejects_revoked_token() {
        let mut store = MockTestCredentialStore::new();
        let user = existing_user("Aa1!aaaa", true);
        let issuer = test_issuer();
        let presented = issuer
            .generate_tokens(&TokenPayload::from(&user.profile()))
            .unwrap()
            .refresh_token;

        let record = RefreshToken {
            id: Uuid::new_v4(),
            user_id: user.id,
            token: presented.clone(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(7),
            revoked: true,
        };

        store
            .expect_find_refresh_token()
            .returning(move |_| Ok(Some(record.clone())));
        store.expect_find_user_by_id().times(0);
        store.expect_create_refresh_token().times(0);

        let service = AuthService::new(Arc::new(store), test_hasher(), issuer);
        let result = service
            .refresh(RefreshCommand {
                refresh_token: presented,
            })
            .await;

        assert_eq!(
            app_error(result),
            AppError::Unauthorized(AppError::INVALID_REFRESH_TOKEN.to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token_without_touching_store() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_refresh_token().times(0);

        let user = existing_user("Aa1!aaaa", true);
        let issuer = test_issuer();
        let access_token = issuer
            .generate_tokens(&TokenPayload::from(&user.profile()))
            .unwrap()
            .access_token;

        let service = AuthService::new(Arc::new(store), test_hasher(), issuer);
        let result = service
            .refresh(RefreshCommand {
                refresh_token: access_token,
            })
            .await;

        assert_eq!(
            app_error(result),
            AppError::Unauthorized(AppError::INVALID_REFRESH_TOKEN.to_string())
        );
    }

    #[tokio::test]
    async fn test_create_user_passes_requested_role_and_status() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find_user_by_email()
            .returning(|_| Ok(None));
        store
            .expect_create_user_atomic()
            .withf(|user| user.requested_role == Some(Role::Admin) && !user.is_active)
            .times(1)
            .returning(|user| {
                let role = user.requested_role.unwrap_or(Role::Member);
                Ok(committed(user, role))
            });
        store.expect_create_refresh_token().times(0);

        let profile = service(store)
            .create_user(CreateUserCommand {
                first_name: "John".to_string(),
                last_name: "Roe".to_string(),
                email: EmailAddress::new("john@x.com").unwrap(),
                password: "Aa1!aaaa".to_string(),
                role: Some(Role::Admin),
                is_active: Some(false),
            })
            .await
            .unwrap();

        assert_eq!(profile.role, Role::Admin);
        assert!(!profile.is_active);
    }

    #[tokio::test]
    async fn test_unknown_email_still_pays_for_a_verification() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_find_user_with_refresh_tokens()
            .times(2)
            .returning(|_| Ok(None));

        let service = service(store);
        assert!(!service.dummy_digest.initialized());

        for _ in 0..2 {
            let result = service
                .login(login_command("nobody@x.com", "anything"))
                .await;
            assert_eq!(app_error(result), AppError::invalid_credentials());
        }

        let digest = service.dummy_digest.get().unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(!service.password_hasher.verify(digest, "anything").unwrap());
    }

    #[tokio::test]
    async fn test_get_user_missing_is_record_not_found() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find_user_by_id().times(1).returning(|_| Ok(None));

        let result = service(store).get_user(&UserId::new()).await;

        assert!(matches!(
            result,
            Err(AuthError::Store(StoreError::RecordNotFound))
        ));
    }

    #[tokio::test]
    async fn test_update_user_forwards_changes() {
        let mut store = MockTestCredentialStore::new();
        let user = existing_user("Aa1!aaaa", true);
        let user_id = user.id;

        store
            .expect_update_user()
            .withf(move |id, changes| {
                *id == user_id
                    && changes.first_name.as_deref() == Some("Janet")
                    && changes.last_name.is_none()
                    && changes.role == Some(Role::Member)
                    && changes.is_active.is_none()
            })
            .times(1)
            .returning(move |_, changes| {
                let mut updated = user.clone();
                updated.first_name = changes.first_name.unwrap_or(updated.first_name);
                updated.role = changes.role.unwrap_or(updated.role);
                Ok(updated)
            });

        let profile = service(store)
            .update_user(
                &user_id,
                UpdateUserCommand {
                    first_name: Some("Janet".to_string()),
                    role: Some(Role::Member),
                    ..UpdateUserCommand::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.first_name, "Janet");
        assert_eq!(profile.role, Role::Member);
    }

    #[tokio::test]
    async fn test_delete_user_propagates_missing_record() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_delete_user()
            .times(1)
            .returning(|_| Err(StoreError::RecordNotFound));

        let result = service(store).delete_user(&UserId::new()).await;

        assert!(matches!(
            result,
            Err(AuthError::Store(StoreError::RecordNotFound))
        ));
    }
}
