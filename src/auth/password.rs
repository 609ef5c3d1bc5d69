/// Password Hashing and Verification
///
/// One-way bcrypt hashing with a configurable cost factor. Policy checks
/// (required, confirmation, length) live in `service::validation`.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// Lowest cost bcrypt accepts. Only suitable for tests.
pub const MIN_COST: u32 = 4;

/// bcrypt ignores input past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    ///
    /// # Errors
    /// Returns `AuthError::Hashing` if the password is longer than
    /// `MAX_PASSWORD_BYTES` or bcrypt fails (e.g. cost out of range)
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Hashing(format!(
                "password exceeds {MAX_PASSWORD_BYTES} bytes"
            )));
        }
        hash(password, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verify a password against its hash
    ///
    /// A mismatch, a malformed hash and an over-long password all yield
    /// `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match verify(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
