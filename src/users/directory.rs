use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::refresh_token;
use crate::error::{AuthError, StoreError};
use crate::users::model::{Credential, User};
use crate::users::store::{CredentialStore, ProfileStore};

/// Profile and credential lookups plus the two-store registration write.
#[derive(Clone)]
pub struct UserDirectory {
    profiles: Arc<dyn ProfileStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl UserDirectory {
    pub fn new(profiles: Arc<dyn ProfileStore>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            profiles,
            credentials,
        }
    }

    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        self.profiles.find_by_login(login).await
    }

    /// # Errors
    /// `AuthError::NotFound` when no profile has this id
    pub async fn find_by_id(&self, id: Uuid) -> Result<User, AuthError> {
        self.profiles.find_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    pub async fn password_hash(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        self.credentials.password_hash(user_id).await
    }

    /// Write the profile, then the credential.
    ///
    /// If the credential write fails the profile is deleted again and the
    /// credential error is returned. If that delete fails too, the result is
    /// `AuthError::InconsistentState` carrying both failures.
    pub async fn create(&self, user: User, credential: Credential) -> Result<User, AuthError> {
        debug_assert_eq!(user.id, credential.user_id);

        self.profiles.insert(&user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::UserAlreadyExists,
            e => AuthError::Store(e),
        })?;

        if let Err(cause) = self.credentials.insert(&credential).await {
            tracing::warn!(
                user_id = %user.id,
                error = %cause,
                "Credential insert failed, removing profile"
            );

            if let Err(compensation) = self.profiles.delete(user.id).await {
                return Err(AuthError::InconsistentState {
                    cause: Box::new(AuthError::Store(cause)),
                    compensation,
                });
            }
            return Err(AuthError::Store(cause));
        }

        Ok(user)
    }

    /// Record a successful login and the digest of the refresh token issued
    /// with it.
    pub async fn update_last_login(
        &self,
        id: Uuid,
        refresh_token: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.profiles
            .record_login(id, at, &refresh_token::digest(refresh_token))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => AuthError::NotFound,
                e => AuthError::Store(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::users::memory::faulty::{FaultyCredentialStore, FaultyProfileStore};
    use crate::users::memory::{InMemoryCredentialStore, InMemoryProfileStore};

    fn new_user(login: &str) -> (User, Credential) {
        let user = User::new(login.to_string(), "Alice".to_string(), String::new(), Utc::now());
        let credential = Credential {
            user_id: user.id,
            password_hash: "hash".to_string(),
            expires_at: None,
        };
        (user, credential)
    }

    #[tokio::test]
    async fn test_create_writes_both_records() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let directory = UserDirectory::new(profiles.clone(), credentials.clone());

        let (user, credential) = new_user("alice");
        let created = directory.create(user.clone(), credential).await.unwrap();

        assert_eq!(created, user);
        assert_eq!(directory.find_by_login("alice").await.unwrap(), Some(user.clone()));
        assert_eq!(directory.password_hash(user.id).await.unwrap().as_deref(), Some("hash"));
        assert_eq!(credentials.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_rolls_back_profile() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let credentials = Arc::new(FaultyCredentialStore::failing());
        let directory = UserDirectory::new(profiles.clone(), credentials);

        let (user, credential) = new_user("alice");
        let result = directory.create(user, credential).await;

        assert!(matches!(result, Err(AuthError::Store(StoreError::Database(_)))));
        assert_eq!(directory.find_by_login("alice").await.unwrap(), None);
        assert!(profiles.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_rollback_is_inconsistent_state() {
        let inner = Arc::new(InMemoryProfileStore::new());
        let profiles = Arc::new(FaultyProfileStore::new(inner.clone()));
        profiles.fail_delete.store(true, Ordering::SeqCst);
        let directory =
            UserDirectory::new(profiles, Arc::new(FaultyCredentialStore::failing()));

        let (user, credential) = new_user("alice");
        let result = directory.create(user, credential).await;

        match result {
            Err(AuthError::InconsistentState { cause, compensation }) => {
                assert!(matches!(*cause, AuthError::Store(StoreError::Database(_))));
                assert!(matches!(compensation, StoreError::Unavailable(_)));
            }
            other => panic!("expected InconsistentState, got {:?}", other),
        }
        // orphan remains
        assert_eq!(inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_login() {
        let directory = UserDirectory::new(
            Arc::new(InMemoryProfileStore::new()),
            Arc::new(InMemoryCredentialStore::new()),
        );
        let (first, first_credential) = new_user("alice");
        directory.create(first, first_credential).await.unwrap();

        let (second, second_credential) = new_user("alice");
        let result = directory.create(second, second_credential).await;
        assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let directory = UserDirectory::new(
            Arc::new(InMemoryProfileStore::new()),
            Arc::new(InMemoryCredentialStore::new()),
        );
        let result = directory.find_by_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_last_login_stores_digest() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let directory =
            UserDirectory::new(profiles.clone(), Arc::new(InMemoryCredentialStore::new()));
        let (user, credential) = new_user("alice");
        directory.create(user.clone(), credential).await.unwrap();

        let at = Utc::now();
        directory.update_last_login(user.id, "refresh", at).await.unwrap();

        let stored = directory.find_by_id(user.id).await.unwrap();
        assert_eq!(stored.last_login_at, Some(at));
        assert_eq!(
            profiles.refresh_token_digest(user.id).await,
            Some(refresh_token::digest("refresh"))
        );
    }
}
