/// Storage seams for the user directory.
///
/// Profiles and credentials live in two independent stores with no shared
/// transaction; `UserDirectory` sequences writes across them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::users::model::{Credential, User};

/// Document-style profile records keyed by id and by login.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when no profile has this login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::Conflict` if the id or login is taken.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Set `last_login_at` and remember the digest of the last issued
    /// refresh token. `StoreError::NotFound` for an unknown id.
    async fn record_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        refresh_token_digest: &str,
    ) -> Result<(), StoreError>;
}

/// Relational password records, one per user.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert(&self, credential: &Credential) -> Result<(), StoreError>;

    async fn password_hash(&self, user_id: Uuid) -> Result<Option<String>, StoreError>;
}
