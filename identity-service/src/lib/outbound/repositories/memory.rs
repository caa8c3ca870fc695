use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewRefreshToken;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RefreshToken;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserWithRefreshTokens;
use crate::domain::user::ports::CredentialStore;
use crate::user::errors::StoreError;

/// SQLSTATE reported when a refresh token references a missing user.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Default)]
struct State {
    users: Vec<User>,
    refresh_tokens: Vec<RefreshToken>,
}

/// Credential store held in process memory.
///
/// One lock guards both collections, so the count-decide-insert sequence of
/// [`CredentialStore::create_user_atomic`] runs under a single write guard.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.len() as u64)
    }

    async fn create_user_atomic(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                field: "email".to_string(),
            });
        }

        let now = Utc::now();
        let created = User {
            id: UserId::new(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: Role::for_new_user(state.users.len() as u64, user.requested_role),
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
        };

        state.users.push(created.clone());

        Ok(created)
    }

    async fn update_user(
        &self,
        id: &UserId,
        changes: UpdateUserCommand,
    ) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        let user = state
            .users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or(StoreError::RecordNotFound)?;

        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        let before = state.users.len();
        state.users.retain(|u| &u.id != id);
        if state.users.len() == before {
            return Err(StoreError::RecordNotFound);
        }

        state.refresh_tokens.retain(|t| &t.user_id != id);

        Ok(())
    }

    async fn create_refresh_token(
        &self,
        token: NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let mut state = self.state.write().await;

        if !state.users.iter().any(|u| u.id == token.user_id) {
            return Err(StoreError::Rejected {
                code: FOREIGN_KEY_VIOLATION.to_string(),
                detail: format!("user {} does not exist", token.user_id),
            });
        }

        if state.refresh_tokens.iter().any(|t| t.token == token.token) {
            return Err(StoreError::UniqueViolation {
                field: "token".to_string(),
            });
        }

        let record = RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token: token.token,
            created_at: Utc::now(),
            expires_at: token.expires_at,
            revoked: false,
        };

        state.refresh_tokens.push(record.clone());

        Ok(record)
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let state = self.state.read().await;
        Ok(state.refresh_tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn find_user_with_refresh_tokens(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserWithRefreshTokens>, StoreError> {
        let state = self.state.read().await;

        let Some(user) = state.users.iter().find(|u| &u.email == email) else {
            return Ok(None);
        };

        let mut refresh_tokens: Vec<RefreshToken> = state
            .refresh_tokens
            .iter()
            .filter(|t| t.user_id == user.id)
            .cloned()
            .collect();
        refresh_tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Some(UserWithRefreshTokens {
            user: user.clone(),
            refresh_tokens,
        }))
    }
}
