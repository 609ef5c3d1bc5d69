/// Authentication primitives
///
/// Password hashing, signed time-bounded tokens, and the refresh token
/// audit digest.

mod claims;
mod jwt;
mod password;
pub mod refresh_token;

pub use claims::{Claims, UserTokenInfo};
pub use jwt::TokenIssuer;
pub use password::{PasswordHasher, MAX_PASSWORD_BYTES, MIN_COST};
