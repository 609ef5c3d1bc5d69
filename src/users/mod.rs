/// User directory: profile and credential records and the stores behind them.

mod directory;
pub mod memory;
mod model;
pub mod postgres;
mod store;

pub use directory::UserDirectory;
pub use model::{Credential, LoginType, User};
pub use store::{CredentialStore, ProfileStore};
