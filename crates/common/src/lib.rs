// ================
// common/src/lib.rs
// ================
//! Common domain types shared between the Authgate backend crates:
//! user records, refresh-token ledger rows, and the token type tag
//! carried inside bearer-token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque user identifier
pub type UserId = Uuid;

/// Type tag embedded in bearer-token claims.
///
/// Access tokens historically omit the tag, so deserialization defaults
/// to `Access` when the field is absent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented as `Authorization: Bearer <token>`
    #[default]
    Access,
    /// Long-lived token exchanged for a fresh pair at the refresh endpoint
    Refresh,
}

/// A user record as persisted by the credential store.
///
/// The full record (including `password_hash`) never crosses the engine
/// boundary toward a client; see [`PublicUser`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    /// Immutable identifier assigned at creation
    pub id: UserId,
    /// Case-preserving email address, unique per account
    pub email: String,
    /// Salted one-way hash in PHC string format
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Project the record down to the fields safe to return to clients.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// The client-visible view of a user. Excludes the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        user.public()
    }
}

/// A refresh-token row as returned by ledger lookup.
///
/// `email` is joined from the owning user at lookup time; it is not part
/// of the stored row. A row is valid iff `expires_at > now`; expired rows
/// may remain physically present until overwritten or cleaned, but read
/// paths treat them as absent.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshTokenRecord {
    /// The token string itself, unique across all records
    pub token: String,
    /// Owning user
    pub user_id: UserId,
    /// Email of the owning user
    pub email: String,
    /// Hard expiry; the row is logically absent past this instant
    pub expires_at: DateTime<Utc>,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
}
