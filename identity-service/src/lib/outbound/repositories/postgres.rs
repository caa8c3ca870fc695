use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
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

/// Advisory lock key serializing user creation across connections.
const USER_CREATION_LOCK_KEY: i64 = 0x7573_6572_6372_6561;

/// Tables whose unique constraints follow the `<table>_<field>_key` pattern.
const KNOWN_TABLES: [&str; 2] = ["refresh_tokens", "users"];

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: EmailAddress::new(&row.email)
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?,
            password_hash: row.password_hash,
            role: row
                .role
                .parse::<Role>()
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    user_id: Uuid,
    token: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshToken {
            id: row.id,
            user_id: UserId(row.user_id),
            token: row.token,
            created_at: row.created_at,
            expires_at: row.expires_at,
            revoked: row.revoked,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => StoreError::RecordNotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation {
                    field: db_err
                        .constraint()
                        .map(field_from_constraint)
                        .unwrap_or_else(|| "unknown".to_string()),
                }
            }
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => StoreError::Rejected {
                    code: code.into_owned(),
                    detail: db_err.message().to_string(),
                },
                None => StoreError::Unavailable(error.to_string()),
            },
            _ => StoreError::Unavailable(error.to_string()),
        }
    }
}

/// `users_email_key` -> `email`, `refresh_tokens_token_key` -> `token`.
fn field_from_constraint(constraint: &str) -> String {
    let without_suffix = constraint.strip_suffix("_key").unwrap_or(constraint);

    KNOWN_TABLES
        .iter()
        .find_map(|table| {
            without_suffix
                .strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
        })
        .unwrap_or(without_suffix)
        .to_string()
}

impl PostgresCredentialStore {
    async fn refresh_tokens_for(&self, user_id: &UserId) -> Result<Vec<RefreshToken>, StoreError> {
        let rows: Vec<RefreshTokenRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, token, created_at, expires_at, revoked
            FROM refresh_tokens
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RefreshToken::from).collect())
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|e| StoreError::InvalidRecord(e.to_string()))
    }

    async fn create_user_atomic(&self, user: NewUser) -> Result<User, StoreError> {
        let mut transaction = self.pool.begin().await?;

        // Held until commit or rollback; concurrent creators queue here.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(USER_CREATION_LOCK_KEY)
            .execute(&mut *transaction)
            .await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *transaction)
            .await?;
        let existing =
            u64::try_from(existing).map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        let role = Role::for_new_user(existing, user.requested_role);
        let now = Utc::now();

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, first_name, last_name, email, password_hash, role, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(role.as_str())
        .bind(user.is_active)
        .bind(now)
        .fetch_one(&mut *transaction)
        .await?;

        transaction.commit().await?;

        tracing::debug!(
            user_id = %row.id,
            role = %role,
            existing_users = existing,
            "User row committed"
        );

        User::try_from(row)
    }

    async fn update_user(
        &self,
        id: &UserId,
        changes: UpdateUserCommand,
    ) -> Result<User, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $1
            RETURNING id, first_name, last_name, email, password_hash, role, is_active, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.role.map(|role| role.as_str()))
        .bind(changes.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::RecordNotFound)
            .and_then(User::try_from)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound);
        }

        Ok(())
    }

    async fn create_refresh_token(
        &self,
        token: NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let row: RefreshTokenRow = sqlx::query_as(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token, created_at, expires_at, revoked
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token.user_id.0)
        .bind(&token.token)
        .bind(Utc::now())
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, token, created_at, expires_at, revoked
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshToken::from))
    }

    async fn find_user_with_refresh_tokens(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserWithRefreshTokens>, StoreError> {
        let Some(user) = self.find_user_by_email(email).await? else {
            return Ok(None);
        };

        let refresh_tokens = self.refresh_tokens_for(&user.id).await?;

        Ok(Some(UserWithRefreshTokens {
            user,
            refresh_tokens,
        }))
    }
}
