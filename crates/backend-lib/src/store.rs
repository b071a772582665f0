// ============================
// crates/backend-lib/src/store.rs
// ============================
//! Storage abstraction with in-memory and flat-file implementations.
//!
//! Two traits split the persistence surface: [`CredentialStore`] for user
//! records and [`RefreshTokenLedger`] for issued refresh tokens. Both
//! backends implement both traits; the engine is written against the
//! [`AuthStore`] bound and never sees a concrete backend.
use async_trait::async_trait;
use authgate_common::{PublicUser, RefreshTokenRecord, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::RwLock};
use uuid::Uuid;

use crate::error::AppError;
use crate::validation::normalize_email;

/// Persistence for user records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. Fails with [`AppError::EmailTaken`] when the
    /// email is already registered (case-insensitive comparison).
    async fn create_user(&self, email: &str, password_hash: &str)
        -> Result<PublicUser, AppError>;

    /// Look up the full record, including the password hash. Internal use
    /// only; nothing returned from here may reach a client directly.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Look up the client-safe view of a user.
    async fn find_by_id(&self, id: UserId) -> Result<Option<PublicUser>, AppError>;
}

/// Persistence for issued refresh tokens
#[async_trait]
pub trait RefreshTokenLedger: Send + Sync {
    /// Durably record an issued refresh token.
    async fn save_refresh_token(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Look up a refresh token. Returns `None` for unknown tokens, expired
    /// rows, and rows whose owning user no longer resolves.
    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError>;

    /// Delete exactly one row if it exists, returning whether a row was
    /// removed. The delete is atomic under the store's write lock, which
    /// makes it the serialization point for concurrent rotation: of two
    /// racing callers exactly one observes `true`.
    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, AppError>;

    /// Delete every row belonging to a user, returning the count removed.
    async fn revoke_all_refresh_tokens(&self, user_id: UserId) -> Result<u64, AppError>;
}

/// Combined bound the engine and router are generic over.
pub trait AuthStore: CredentialStore + RefreshTokenLedger {}
impl<T: CredentialStore + RefreshTokenLedger> AuthStore for T {}

/// Stored ledger row. `email` is joined from the user at lookup time.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RefreshTokenRow {
    user_id: UserId,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(Default, Serialize, Deserialize)]
struct StoreInner {
    /// Users keyed by id
    users: HashMap<UserId, User>,
    /// Normalized email -> user id
    emails: HashMap<String, UserId>,
    /// Refresh token string -> row
    tokens: HashMap<String, RefreshTokenRow>,
}

/// In-memory implementation of both store traits.
///
/// All mutations happen under one write lock, so email uniqueness and
/// conditional token deletes are atomic without further coordination.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the full store state. Used by [`FlatFileStore`] to
    /// persist after each mutation.
    pub(crate) async fn export(&self) -> Result<String, AppError> {
        let inner = self.inner.read().await;
        let json = serde_json::to_string_pretty(&*inner)?;
        Ok(json)
    }

    /// Replace the store state from a serialized snapshot.
    pub(crate) async fn import(&self, json: &str) -> Result<(), AppError> {
        let snapshot: StoreInner = serde_json::from_str(json)?;
        let mut inner = self.inner.write().await;
        *inner = snapshot;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<PublicUser, AppError> {
        let key = normalize_email(email);
        let mut inner = self.inner.write().await;
        if inner.emails.contains_key(&key) {
            return Err(AppError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        let public = user.public();
        inner.emails.insert(key, user.id);
        inner.users.insert(user.id, user);
        Ok(public)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let key = normalize_email(email);
        let inner = self.inner.read().await;
        let user = inner
            .emails
            .get(&key)
            .and_then(|id| inner.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<PublicUser>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).map(User::public))
    }
}

#[async_trait]
impl RefreshTokenLedger for MemoryStore {
    async fn save_refresh_token(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.tokens.insert(
            token.to_string(),
            RefreshTokenRow {
                user_id,
                expires_at,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let inner = self.inner.read().await;
        let Some(row) = inner.tokens.get(token) else {
            return Ok(None);
        };
        // Expired rows stay stored until revoked but are logically absent
        if row.expires_at <= Utc::now() {
            return Ok(None);
        }
        let Some(user) = inner.users.get(&row.user_id) else {
            return Ok(None);
        };
        Ok(Some(RefreshTokenRecord {
            token: token.to_string(),
            user_id: row.user_id,
            email: user.email.clone(),
            expires_at: row.expires_at,
            created_at: row.created_at,
        }))
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.tokens.remove(token).is_some())
    }

    async fn revoke_all_refresh_tokens(&self, user_id: UserId) -> Result<u64, AppError> {
        let mut inner = self.inner.write().await;
        let before = inner.tokens.len();
        inner.tokens.retain(|_, row| row.user_id != user_id);
        Ok((before - inner.tokens.len()) as u64)
    }
}

/// Flat-file implementation: an in-memory store loaded from disk at
/// startup and persisted after every mutation.
///
/// Writes go through a temp file followed by a rename, so a crash
/// mid-write leaves the previous snapshot intact. All mutations are
/// serialized by the inner store's write lock plus the persist step
/// running on the same call path, which preserves the conditional-delete
/// guarantee of [`RefreshTokenLedger::revoke_refresh_token`].
#[derive(Clone)]
pub struct FlatFileStore {
    inner: MemoryStore,
    root: PathBuf,
    /// Serializes snapshot writes so an older export can never overwrite
    /// a newer one.
    persist_lock: Arc<tokio::sync::Mutex<()>>,
}

impl FlatFileStore {
    const SNAPSHOT_FILE: &'static str = "store.json";

    /// Open or create a store rooted at `root`.
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let store = Self {
            inner: MemoryStore::new(),
            root,
            persist_lock: Arc::new(tokio::sync::Mutex::new(())),
        };
        store.load().await?;
        Ok(store)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.root.join(Self::SNAPSHOT_FILE)
    }

    async fn load(&self) -> Result<(), AppError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(());
        }
        let json = tokio_fs::read_to_string(&path).await?;
        self.inner.import(&json).await
    }

    async fn persist(&self) -> Result<(), AppError> {
        let _guard = self.persist_lock.lock().await;
        let json = self.inner.export().await?;
        let path = self.snapshot_path();
        let tmp = self.root.join(format!("{}.tmp", Self::SNAPSHOT_FILE));
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FlatFileStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<PublicUser, AppError> {
        let user = self.inner.create_user(email, password_hash).await?;
        self.persist().await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<PublicUser>, AppError> {
        self.inner.find_by_id(id).await
    }
}

#[async_trait]
impl RefreshTokenLedger for FlatFileStore {
    async fn save_refresh_token(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.inner
            .save_refresh_token(user_id, token, expires_at)
            .await?;
        self.persist().await
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        self.inner.find_refresh_token(token).await
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<bool, AppError> {
        let removed = self.inner.revoke_refresh_token(token).await?;
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn revoke_all_refresh_tokens(&self, user_id: UserId) -> Result<u64, AppError> {
        let removed = self.inner.revoke_all_refresh_tokens(user_id).await?;
        if removed > 0 {
            self.persist().await?;
        }
        Ok(removed)
    }
}
