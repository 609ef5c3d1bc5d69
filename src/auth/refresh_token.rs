/// Refresh token audit digest
///
/// The last issued refresh token is recorded on the profile for audit only.
/// Only its SHA-256 digest is ever stored.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a refresh token.
pub fn digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
