// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the Authgate token service.

pub mod auth;
pub mod config;
pub mod error;
pub mod messages;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod store;
pub mod validation;

use crate::auth::AuthEngine;
use crate::config::Settings;
use crate::middleware::RateLimitEntry;
use crate::store::AuthStore;
use dashmap::DashMap;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Authentication engine
    pub engine: AuthEngine<S>,
    /// Configuration settings
    pub settings: Arc<Settings>,
    /// Per-client rate limit windows
    pub rate_limits: DashMap<String, RateLimitEntry>,
}

impl<S: AuthStore> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, config: &Settings) -> anyhow::Result<Self> {
        let engine = AuthEngine::new(storage, config)?;
        Ok(Self {
            engine,
            settings: Arc::new(config.clone()),
            rate_limits: DashMap::new(),
        })
    }
}
