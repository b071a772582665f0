// ============================
// crates/backend-lib/src/error.rs
// ============================
//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("Invalid token type")]
    InvalidTokenType,

    #[error("Invalid refresh token")]
    RefreshTokenInvalid,

    #[error("User not found")]
    UserNotFound,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::UserNotFound => StatusCode::UNAUTHORIZED,
            AppError::TokenInvalid
            | AppError::InvalidTokenType
            | AppError::RefreshTokenInvalid => StatusCode::FORBIDDEN,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::EmailTaken => "USER_001",
            AppError::InvalidCredentials => "AUTH_001",
            AppError::MissingToken => "AUTH_002",
            AppError::TokenInvalid => "AUTH_003",
            AppError::InvalidTokenType => "AUTH_004",
            AppError::RefreshTokenInvalid => "AUTH_005",
            AppError::UserNotFound => "USER_002",
            AppError::RateLimitExceeded => "RATE_001",
            AppError::Storage(_) => "STORE_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::EmailTaken => "User with this email already exists".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::MissingToken => "Access token required".to_string(),
            AppError::TokenInvalid => "Invalid or expired token".to_string(),
            AppError::InvalidTokenType => "Invalid token type".to_string(),
            AppError::RefreshTokenInvalid => "Invalid refresh token".to_string(),
            AppError::UserNotFound => "User not found".to_string(),
            AppError::RateLimitExceeded => {
                "Too many requests, please try again later".to_string()
            },
            AppError::Storage(_) | AppError::Io(_) | AppError::Json(_) => {
                "Internal server error".to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Storage(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Storage(msg.to_string())
    }
}
