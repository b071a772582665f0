// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Bearer-token codec: signed, self-contained HS256 tokens carrying
//! identity claims, a type tag, and an expiry.
use authgate_common::{TokenKind, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::token_id::generate_token_id;
use crate::config::TokenSettings;
use crate::error::AppError;

/// Claims carried by every minted token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    /// Owning user id
    pub sub: UserId,
    /// Email at mint time
    pub email: String,
    /// Access or refresh; absent on the wire means access
    #[serde(rename = "type", default)]
    pub kind: TokenKind,
    /// Unique token id
    pub jti: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Mints and verifies bearer tokens with a process-wide secret.
///
/// The secret is read once at construction and never rotated for the
/// life of the process. Minting and verification are pure in-process
/// computations and safe to run with arbitrary concurrency.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from token settings. Fails on an empty secret.
    pub fn new(settings: &TokenSettings) -> anyhow::Result<Self> {
        if settings.secret.trim().is_empty() {
            anyhow::bail!("signing secret must not be empty");
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            access_ttl: Duration::seconds(settings.access_ttl_secs as i64),
            refresh_ttl: Duration::seconds(settings.refresh_ttl_secs as i64),
        })
    }

    /// Lifetime applied to refresh tokens; the ledger row shares it.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Mint a signed token for a user.
    pub fn mint(&self, user_id: UserId, email: &str, kind: TokenKind) -> Result<String, AppError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            kind,
            jti: generate_token_id(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AppError::TokenInvalid)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// The type tag is NOT checked here; callers that care about the
    /// kind (the engine does) must check `claims.kind` explicitly.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::TokenInvalid)
    }
}
