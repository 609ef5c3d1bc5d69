/// JWT Claims structure
///
/// Session tokens carry a `user` claim with the subject's identity.
/// Refresh tokens carry only the registered claims (`iat`, `exp`, `iss`).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::users::User;

/// Identity embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTokenInfo {
    /// User ID as UUID string
    pub id: String,
    pub login: String,
    /// Display name
    pub name: String,
}

impl UserTokenInfo {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            login: user.login.clone(),
            name: user.display_name(),
        }
    }

    /// Parse the subject id, `None` if it is not a UUID.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.id).ok()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserTokenInfo>,
}

impl Claims {
    /// Build claims valid for `ttl_minutes` starting at `now`.
    ///
    /// # Errors
    /// `AuthError::Token` if the expiry does not fit in a timestamp
    pub fn new(
        user: Option<UserTokenInfo>,
        ttl_minutes: i64,
        issuer: String,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let exp = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AuthError::Token(format!("token lifetime out of range: {ttl_minutes} minutes"))
            })?;

        Ok(Self {
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: issuer,
            user,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserTokenInfo {
        UserTokenInfo {
            id: Uuid::new_v4().to_string(),
            login: "alice".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[test]
    fn test_claims_creation() {
        let now = Utc::now();
        let claims = Claims::new(Some(identity()), 5, "test".to_string(), now).unwrap();

        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 300);
        assert_eq!(claims.iss, "test");
        assert!(claims.user.is_some());
        assert!(!claims.is_expired_at(now));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let claims = Claims::new(None, 5, "test".to_string(), now).unwrap();

        assert!(!claims.is_expired_at(now + Duration::minutes(5)));
        assert!(claims.is_expired_at(now + Duration::minutes(5) + Duration::seconds(1)));
    }

    #[test]
    fn test_refresh_claims_omit_user() {
        let claims = Claims::new(None, 60, "test".to_string(), Utc::now()).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert!(json.get("user").is_none());
    }

    #[test]
    fn test_huge_ttl_is_token_error() {
        let result = Claims::new(None, i64::MAX, "test".to_string(), Utc::now());
        assert!(matches!(result, Err(AuthError::Token(_))));

        let result = Claims::new(None, 200_000_000_000, "test".to_string(), Utc::now());
        assert!(matches!(result, Err(AuthError::Token(_))));
    }

    #[test]
    fn test_user_id_extraction() {
        let mut info = identity();
        assert!(info.user_id().is_some());

        info.id = "invalid-uuid".to_string();
        assert!(info.user_id().is_none());
    }
}
