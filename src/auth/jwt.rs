/// JWT Token Issuance and Verification
///
/// Signs session and refresh tokens with HS256. Expiry is checked against
/// the caller-supplied time rather than the library's system clock so that
/// token lifetimes follow the service `Clock`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, UserTokenInfo};
use crate::error::AuthError;

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl TokenIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
        }
    }

    /// Sign a token valid from `now` for `ttl_minutes`.
    ///
    /// Passing `None` as identity yields a refresh token.
    ///
    /// # Errors
    /// Returns `AuthError::Token` if the expiry overflows or signing fails
    pub fn issue(
        &self,
        ttl_minutes: i64,
        identity: Option<UserTokenInfo>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(identity, ttl_minutes, self.issuer.clone(), now)?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Check signature, issuer and expiry.
    ///
    /// Never fails: a malformed, tampered, foreign or expired token
    /// yields `None`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        // expiry is checked below against `now`
        validation.validate_exp = false;

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "JWT validation error");
                return None;
            }
        };

        if claims.is_expired_at(now) {
            tracing::debug!(exp = claims.exp, "JWT expired");
            return None;
        }

        Some(claims)
    }
}
