use crate::auth::UserTokenInfo;
use crate::error::AuthError;
use crate::service::validation::{validate_login, validate_refresh};
use crate::service::{AuthService, AuthSuccess, LoginRequest, RefreshRequest};
use crate::users::User;

impl AuthService {
    /// Exchange login and password for a session and refresh token.
    ///
    /// An unknown login, a failed lookup, a missing credential and a wrong
    /// password all yield `AuthError::InvalidCredentials`.
    #[tracing::instrument(name = "login", skip_all, fields(login = %request.login))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSuccess, AuthError> {
        validate_login(request)?;

        let user = match self.directory().find_by_login(&request.login).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!("Login for unknown user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed during login");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let hash = match self.directory().password_hash(user.id).await? {
            Some(hash) => hash,
            None => {
                tracing::warn!(user_id = %user.id, "User has no credential record");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.verify_password(request.password.clone(), hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let success = self.issue_session(user).await?;
        tracing::info!(user_id = %success.user.id, "User logged in");
        Ok(success)
    }

    /// Re-issue both tokens for `request.id` given a valid refresh token.
    ///
    /// The token is checked for signature, issuer and expiry only. It is not
    /// matched against the digest recorded for the user, and its identity
    /// claim is ignored, so any live token from this issuer renews any user id.
    #[tracing::instrument(name = "refresh", skip_all, fields(user_id = %request.id))]
    pub async fn refresh(&self, request: &RefreshRequest) -> Result<AuthSuccess, AuthError> {
        let user_id = validate_refresh(request)?;
        let user = self.directory().find_by_id(user_id).await?;

        if self
            .tokens()
            .verify(&request.refresh_token, self.inner.clock.now())
            .is_none()
        {
            return Err(AuthError::RefreshTokenExpired);
        }

        let success = self.issue_session(user).await?;
        tracing::info!("Tokens refreshed");
        Ok(success)
    }

    async fn issue_session(&self, mut user: User) -> Result<AuthSuccess, AuthError> {
        let now = self.inner.clock.now();
        let policy = self.policy();

        let token = self.tokens().issue(
            policy.token_expiration_minutes,
            Some(UserTokenInfo::from_user(&user)),
            now,
        )?;
        let refresh_token =
            self.tokens()
                .issue(policy.refresh_token_expiration_minutes, None, now)?;

        self.directory()
            .update_last_login(user.id, &refresh_token, now)
            .await?;
        user.last_login_at = Some(now);

        Ok(AuthSuccess {
            token,
            refresh_token,
            user,
        })
    }
}
