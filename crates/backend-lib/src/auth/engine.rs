// ============================
// crates/backend-lib/src/auth/engine.rs
// ============================
//! The authentication engine: composes the credential store, password
//! hasher, token codec, and refresh-token ledger into the signup, login,
//! authenticate, refresh-rotation, and logout operations.
//!
//! All error mapping to the public taxonomy happens here; raw storage or
//! cryptographic detail never crosses this boundary.
use authgate_common::{PublicUser, TokenKind};
use chrono::Utc;
use metrics::counter;
use tracing::{info, warn};
use zeroize::Zeroize;

use super::{password::PasswordHasher, token::TokenCodec};
use crate::config::Settings;
use crate::error::AppError;
use crate::metrics as keys;
use crate::store::AuthStore;
use crate::validation::validate_credentials;

/// A freshly minted access/refresh token pair.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful signup or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: PublicUser,
    pub tokens: AuthTokens,
}

/// Orchestrates credential verification and the token lifecycle over an
/// injected storage backend.
pub struct AuthEngine<S> {
    store: S,
    hasher: PasswordHasher,
    codec: TokenCodec,
    /// Verified against when login hits an unknown email, so the absent
    /// and wrong-password paths cost the same.
    dummy_hash: String,
}

impl<S: AuthStore> AuthEngine<S> {
    /// Build an engine from settings and a storage backend.
    pub fn new(store: S, settings: &Settings) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::new(settings.auth.hash_cost)?;
        let codec = TokenCodec::new(&settings.tokens)?;
        let dummy_hash = hasher.hash("timing-equalizer")?;
        Ok(Self {
            store,
            hasher,
            codec,
            dummy_hash,
        })
    }

    /// Register a new account and issue its first token pair.
    pub async fn signup(&self, email: &str, mut password: String) -> Result<AuthSession, AppError> {
        validate_credentials(email, &password)?;

        let password_hash = self
            .hasher
            .hash_secure(&mut password)
            .map_err(|e| AppError::Storage(e.to_string()))?;

        // The store enforces uniqueness atomically; a racing duplicate
        // signup surfaces as EmailTaken here.
        let user = self.store.create_user(email, &password_hash).await?;
        let tokens = self.issue_tokens(&user).await?;

        counter!(keys::SIGNUP_TOTAL).increment(1);
        info!(user_id = %user.id, "account created");

        Ok(AuthSession { user, tokens })
    }

    /// Verify credentials and issue a fresh token pair.
    pub async fn login(&self, email: &str, mut password: String) -> Result<AuthSession, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let user = self.store.find_by_email(email).await?;
        let verified = match &user {
            Some(user) => self.hasher.verify(&password, &user.password_hash),
            None => {
                // Unknown email: burn the same work as a real verification
                let _ = self.hasher.verify(&password, &self.dummy_hash);
                false
            },
        };
        password.zeroize();

        let Some(user) = user.filter(|_| verified) else {
            counter!(keys::LOGIN_FAILURE).increment(1);
            return Err(AppError::InvalidCredentials);
        };

        let public = user.public();
        let tokens = self.issue_tokens(&public).await?;

        counter!(keys::LOGIN_SUCCESS).increment(1);
        info!(user_id = %public.id, "login");

        Ok(AuthSession {
            user: public,
            tokens,
        })
    }

    /// Resolve a bearer access token to its user.
    ///
    /// Fails `TokenInvalid` on signature/expiry problems,
    /// `InvalidTokenType` when handed a refresh token, and
    /// `UserNotFound` when the account behind a valid token is gone.
    pub async fn authenticate(&self, access_token: &str) -> Result<PublicUser, AppError> {
        let claims = self.codec.verify(access_token)?;
        if claims.kind != TokenKind::Access {
            return Err(AppError::InvalidTokenType);
        }
        self.store
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Rotate a refresh token: invalidate the presented token and return
    /// a new access/refresh pair.
    ///
    /// The ledger's conditional delete is the serialization point for
    /// concurrent rotation: of two racing calls with the same token,
    /// exactly one succeeds; the other fails `RefreshTokenInvalid`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AppError> {
        if refresh_token.is_empty() {
            return Err(AppError::Validation(
                "Refresh token required".to_string(),
            ));
        }

        let claims = self.codec.verify(refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AppError::InvalidTokenType);
        }

        let record = self
            .store
            .find_refresh_token(refresh_token)
            .await?
            .ok_or(AppError::RefreshTokenInvalid)?;

        let access_token = self
            .codec
            .mint(record.user_id, &record.email, TokenKind::Access)?;
        let new_refresh_token = self
            .codec
            .mint(record.user_id, &record.email, TokenKind::Refresh)?;

        // Old token first: once this succeeds the presented token is
        // unusable, and a concurrent rotation that lost the race sees
        // `false` and bails before saving a second child.
        if !self.store.revoke_refresh_token(refresh_token).await? {
            warn!(user_id = %record.user_id, "refresh token already rotated");
            return Err(AppError::RefreshTokenInvalid);
        }
        self.store
            .save_refresh_token(
                record.user_id,
                &new_refresh_token,
                Utc::now() + self.codec.refresh_ttl(),
            )
            .await?;

        counter!(keys::TOKEN_REFRESHED).increment(1);

        Ok(AuthTokens {
            access_token,
            refresh_token: new_refresh_token,
        })
    }

    /// Revoke refresh tokens for an authenticated user.
    ///
    /// With a specific token, only that one is revoked (single-device
    /// logout); without, every token for the user is revoked. Idempotent:
    /// succeeds even when nothing was left to revoke.
    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<PublicUser, AppError> {
        let user = self.authenticate(access_token).await?;

        let revoked = match refresh_token {
            Some(token) => u64::from(self.store.revoke_refresh_token(token).await?),
            None => self.store.revoke_all_refresh_tokens(user.id).await?,
        };

        counter!(keys::TOKEN_REVOKED).increment(revoked);
        info!(user_id = %user.id, revoked, "logout");

        Ok(user)
    }

    /// Mint an access/refresh pair and persist the refresh half.
    async fn issue_tokens(&self, user: &PublicUser) -> Result<AuthTokens, AppError> {
        let access_token = self.codec.mint(user.id, &user.email, TokenKind::Access)?;
        let refresh_token = self.codec.mint(user.id, &user.email, TokenKind::Refresh)?;

        self.store
            .save_refresh_token(
                user.id,
                &refresh_token,
                Utc::now() + self.codec.refresh_ttl(),
            )
            .await?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
        })
    }
}
