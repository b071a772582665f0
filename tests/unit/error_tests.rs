// ==========================
// tests/unit/error_tests.rs
// ==========================
//! Unit tests for the error type's HTTP mapping
use axum::http::StatusCode;
use axum::response::IntoResponse;
use backend_lib::error::AppError;
use http_body_util::BodyExt;

/// Collect a response body into a JSON value
async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_error_envelope_shape() {
    let response = AppError::InvalidCredentials.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "AUTH_001");
    assert!(json["error"]["message"].is_string());
}

#[tokio::test]
async fn test_taxonomy_statuses() {
    let cases = [
        (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
        (AppError::EmailTaken, StatusCode::CONFLICT),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (AppError::MissingToken, StatusCode::UNAUTHORIZED),
        (AppError::TokenInvalid, StatusCode::FORBIDDEN),
        (AppError::InvalidTokenType, StatusCode::FORBIDDEN),
        (AppError::RefreshTokenInvalid, StatusCode::FORBIDDEN),
        (AppError::UserNotFound, StatusCode::UNAUTHORIZED),
        (AppError::RateLimitExceeded, StatusCode::TOO_MANY_REQUESTS),
        (
            AppError::Storage("details".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.status_code(), expected, "{error}");
    }
}

#[tokio::test]
async fn test_validation_message_survives_sanitization() {
    // Validation failures are the caller's fault; the message is the fix
    let err = AppError::Validation("Password must be at least 6 characters long".into());
    assert_eq!(
        err.sanitized_message(),
        "Password must be at least 6 characters long"
    );
}

#[tokio::test]
async fn test_storage_detail_never_reaches_the_body_in_release() {
    let err = AppError::Storage("refresh-tokens.json: disk full".into());
    // The sanitized form is what production responses carry
    assert_eq!(err.sanitized_message(), "Internal server error");
}
