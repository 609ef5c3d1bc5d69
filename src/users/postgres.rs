/// Postgres-backed stores.
///
/// `profiles` and `passwords` are written independently; see
/// `migrations/` for the schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::users::model::{Credential, LoginType, User};
use crate::users::store::{CredentialStore, ProfileStore};

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    login: String,
    login_type: String,
    name: String,
    last_name: String,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for User {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let login_type = LoginType::parse(&row.login_type).ok_or_else(|| {
            StoreError::Database(format!("unknown login type '{}'", row.login_type))
        })?;

        Ok(User {
            id: row.id,
            login: row.login,
            login_type,
            name: row.name,
            last_name: row.last_name,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, login, login_type, name, last_name, last_login_at, created_at
            FROM profiles
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, login, login_type, name, last_name, last_login_at, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, login, login_type, name, last_name, last_login_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.login)
        .bind(user.login_type.as_str())
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn record_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        refresh_token_digest: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET last_login_at = $1, refresh_token_hash = $2
            WHERE id = $3
            "#,
        )
        .bind(at)
        .bind(refresh_token_digest)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("profile {}", id)));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert(&self, credential: &Credential) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO passwords (user_id, password, expires_at) VALUES ($1, $2, $3)")
            .bind(credential.user_id)
            .bind(&credential.password_hash)
            .bind(credential.expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn password_hash(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password FROM passwords WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hash)
    }
}
