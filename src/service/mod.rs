/// Login, refresh and registration orchestration.
///
/// `AuthService` composes the password hasher, token issuer and user
/// directory. It holds no per-request state and is cheap to clone.

mod register;
mod session;
pub mod validation;

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::clock::{Clock, SystemClock};
use crate::configuration::AuthSettings;
use crate::error::AuthError;
use crate::users::{User, UserDirectory};

pub use validation::{LoginRequest, RefreshRequest, RegisterRequest};

/// Tokens issued by a successful login or refresh.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Token lifetimes and password rules, copied out of `AuthSettings`.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    pub token_expiration_minutes: i64,
    pub refresh_token_expiration_minutes: i64,
    pub password_min_length: usize,
    pub password_lifetime_hours: i64,
}

impl From<&AuthSettings> for Policy {
    fn from(settings: &AuthSettings) -> Self {
        Self {
            token_expiration_minutes: settings.token_expiration_minutes,
            refresh_token_expiration_minutes: settings.refresh_token_expiration_minutes,
            password_min_length: settings.password_min_length,
            password_lifetime_hours: settings.password_lifetime_hours,
        }
    }
}

struct Inner {
    directory: UserDirectory,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    policy: Policy,
    clock: Arc<dyn Clock>,
}

#[derive(Clone)]
pub struct AuthService {
    inner: Arc<Inner>,
}

impl AuthService {
    pub fn new(settings: &AuthSettings, directory: UserDirectory) -> Self {
        Self::with_clock(settings, directory, Arc::new(SystemClock))
    }

    pub fn with_clock(
        settings: &AuthSettings,
        directory: UserDirectory,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                directory,
                hasher: PasswordHasher::new(settings.bcrypt_cost),
                tokens: TokenIssuer::new(&settings.token_secret, settings.issuer.clone()),
                policy: Policy::from(settings),
                clock,
            }),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.inner.policy
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    fn directory(&self) -> &UserDirectory {
        &self.inner.directory
    }

    /// bcrypt is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.inner.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.inner.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
