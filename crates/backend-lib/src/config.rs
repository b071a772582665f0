// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind settings
    pub server: ServerSettings,
    /// Durable storage settings
    pub storage: StorageSettings,
    /// Signing secret and token lifetimes
    pub tokens: TokenSettings,
    /// Credential-verification settings
    pub auth: AuthSettings,
    /// Request rate limiting
    pub rate_limit: RateLimitSettings,
    /// Log level filter for the tracing subscriber
    pub log_level: String,
}

/// Server bind address
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Durable storage location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
}

/// Signing secret and token lifetimes.
///
/// The secret is read once at startup and is immutable for the life of
/// the process. An empty secret fails validation; there is no default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Process-wide HMAC signing secret
    pub secret: String,
    /// Access-token lifetime in seconds
    pub access_ttl_secs: u64,
    /// Refresh-token lifetime in seconds
    pub refresh_ttl_secs: u64,
}

/// Credential-verification settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Password hash cost factor, log2 of the scrypt work parameter
    pub hash_cost: u8,
}

/// Request rate limiting
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Window length in seconds
    pub window_secs: u64,
    /// Maximum requests per client per window
    pub max_requests: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            tokens: TokenSettings::default(),
            auth: AuthSettings::default(),
            rate_limit: RateLimitSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_ttl_secs: 15 * 60,           // 15 minutes
            refresh_ttl_secs: 60 * 60 * 24 * 7, // 7 days
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self { hash_cost: 12 }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 100,
        }
    }
}

impl Settings {
    /// Load settings from `config/default.toml` merged with
    /// `AUTHGATE_`-prefixed environment variables (`__` splits sections,
    /// e.g. `AUTHGATE_TOKENS__SECRET`).
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    /// Load settings from an explicit config file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("AUTHGATE_").split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations that must never reach production.
    pub fn validate(&self) -> Result<()> {
        if self.tokens.secret.trim().is_empty() {
            anyhow::bail!(
                "signing secret is not set; configure [tokens] secret or AUTHGATE_TOKENS__SECRET"
            );
        }
        if self.tokens.access_ttl_secs == 0 || self.tokens.refresh_ttl_secs == 0 {
            anyhow::bail!("token lifetimes must be non-zero");
        }
        Ok(())
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port).parse()?;
        Ok(addr)
    }
}
