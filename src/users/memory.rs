/// In-memory stores for tests and single-process runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::users::model::{Credential, User};
use crate::users::store::{CredentialStore, ProfileStore};

#[derive(Debug, Clone)]
struct ProfileRecord {
    user: User,
    refresh_token_digest: Option<String>,
}

/// Profile store backed by a `HashMap` behind a Tokio `RwLock`.
///
/// Enforces login uniqueness on insert, like the unique index of the
/// Postgres store.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    records: RwLock<HashMap<Uuid, ProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn refresh_token_digest(&self, id: Uuid) -> Option<String> {
        self.records
            .read()
            .await
            .get(&id)
            .and_then(|record| record.refresh_token_digest.clone())
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.user.login == login)
            .map(|record| record.user.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.records.read().await.get(&id).map(|record| record.user.clone()))
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        if records.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("profile id {}", user.id)));
        }
        if records.values().any(|record| record.user.login == user.login) {
            return Err(StoreError::Conflict(format!("login {}", user.login)));
        }

        records.insert(
            user.id,
            ProfileRecord {
                user: user.clone(),
                refresh_token_digest: None,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.records.write().await.remove(&id);
        Ok(())
    }

    async fn record_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        refresh_token_digest: &str,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", id)))?;

        record.user.last_login_at = Some(at);
        record.refresh_token_digest = Some(refresh_token_digest.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<Uuid, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn get(&self, user_id: Uuid) -> Option<Credential> {
        self.records.read().await.get(&user_id).cloned()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&credential.user_id) {
            return Err(StoreError::Conflict(format!(
                "credential for {}",
                credential.user_id
            )));
        }
        records.insert(credential.user_id, credential.clone());
        Ok(())
    }

    async fn password_hash(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(&user_id)
            .map(|credential| credential.password_hash.clone()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn user(login: &str) -> User {
        User::new(login.to_string(), "Test".to_string(), String::new(), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryProfileStore::new();
        let alice = user("alice");
        store.insert(&alice).await.unwrap();

        assert_eq!(store.find_by_login("alice").await.unwrap(), Some(alice.clone()));
        assert_eq!(store.find_by_id(alice.id).await.unwrap(), Some(alice));
        assert_eq!(store.find_by_login("Alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_login_conflicts() {
        let store = InMemoryProfileStore::new();
        store.insert(&user("alice")).await.unwrap();

        let result = store.insert(&user("alice")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_record_login_unknown_id() {
        let store = InMemoryProfileStore::new();
        let result = store.record_login(Uuid::new_v4(), Utc::now(), "digest").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_record_login_updates_profile() {
        let store = InMemoryProfileStore::new();
        let alice = user("alice");
        store.insert(&alice).await.unwrap();

        let at = Utc::now();
        store.record_login(alice.id, at, "digest").await.unwrap();

        let stored = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.last_login_at, Some(at));
        assert_eq!(store.refresh_token_digest(alice.id).await.as_deref(), Some("digest"));
    }

    #[tokio::test]
    async fn test_credential_insert_once() {
        let store = InMemoryCredentialStore::new();
        let credential = Credential {
            user_id: Uuid::new_v4(),
            password_hash: "hash".to_string(),
            expires_at: None,
        };

        store.insert(&credential).await.unwrap();
        assert!(store.insert(&credential).await.is_err());
        assert_eq!(
            store.password_hash(credential.user_id).await.unwrap().as_deref(),
            Some("hash")
        );
    }
}
