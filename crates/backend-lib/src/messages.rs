// ============================
// crates/backend-lib/src/messages.rs
// ============================
//! Wire types for the HTTP API.
//!
//! Requests default missing fields to empty strings so field-presence
//! checks produce the same validation failure as empty values, and
//! responses use the `{success, message, data}` envelope with camelCase
//! token fields.

use authgate_common::PublicUser;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/signup`
#[derive(Deserialize, Debug, Clone)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/auth/login`
#[derive(Deserialize, Debug, Clone)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/auth/refresh`
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Body of `POST /api/auth/logout`. The refresh token is optional: when
/// present only that token is revoked, otherwise all of the user's are.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Success envelope wrapping every response body
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Payload returned by signup and login
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Payload returned by refresh
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairPayload {
    pub access_token: String,
    pub refresh_token: String,
}

/// Payload returned by profile
#[derive(Serialize, Debug)]
pub struct ProfilePayload {
    pub user: PublicUser,
}
