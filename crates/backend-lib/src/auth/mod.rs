// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module: password hashing, token minting/verification,
//! and the engine orchestrating the credential and token stores.

pub mod engine;
pub mod password;
pub mod token;
mod token_id;

pub use engine::{AuthEngine, AuthSession, AuthTokens};
pub use password::PasswordHasher;
pub use token::{Claims, TokenCodec};
pub use token_id::generate_token_id;
