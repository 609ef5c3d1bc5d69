use chrono::Duration;

use crate::error::AuthError;
use crate::service::validation::validate_registration;
use crate::service::{AuthService, RegisterRequest};
use crate::users::{Credential, User};

impl AuthService {
    /// Create a profile and its credential.
    ///
    /// The existing-login check and the insert are not atomic; two
    /// concurrent registrations of one login are only kept apart by a
    /// uniqueness constraint in the profile store.
    #[tracing::instrument(name = "register", skip_all, fields(login = %request.login))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        validate_registration(request, self.policy().password_min_length)?;

        if self.directory().find_by_login(&request.login).await?.is_some() {
            tracing::info!("Registration for an existing login");
            return Err(AuthError::UserAlreadyExists);
        }

        let now = self.inner.clock.now();
        let lifetime_hours = self.policy().password_lifetime_hours;
        let expires_at = Duration::try_hours(lifetime_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::Hashing(format!("password lifetime out of range: {lifetime_hours} hours"))
            })?;

        let user = User::new(
            request.login.clone(),
            request.name.clone(),
            request.last_name.clone(),
            now,
        );
        let password_hash = self.hash_password(request.password.clone()).await?;
        let credential = Credential {
            user_id: user.id,
            password_hash,
            expires_at: Some(expires_at),
        };

        let user = self.directory().create(user, credential).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }
}
