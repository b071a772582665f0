// ===================================
// tests/integration/http_api_tests.rs
// ===================================
//! HTTP-level tests driving the full router with oneshot requests.
use crate::test_utils::test_app;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Build a JSON request
fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and return status plus parsed body
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Sign up a user and return (accessToken, refreshToken)
async fn signup(app: &Router, email: &str, password: &str) -> (String, String) {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"email": email, "password": password}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["data"]["accessToken"].as_str().unwrap().to_string(),
        body["data"]["refreshToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_signup_returns_user_and_tokens() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"email": "a@x.com", "password": "secret1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["user"]["email"], "a@x.com");
    assert!(data["user"]["id"].is_string());
    assert!(data["user"].get("password_hash").is_none());

    let access = data["accessToken"].as_str().unwrap();
    let refresh = data["refreshToken"].as_str().unwrap();
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);
}

#[tokio::test]
async fn test_signup_conflicts_and_validation() {
    let app = test_app();
    signup(&app, "a@x.com", "secret1").await;

    // Same email again conflicts
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"email": "a@x.com", "password": "secret1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // Missing fields and short passwords are the caller's fault
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/auth/signup", json!({"email": "b@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"email": "b@x.com", "password": "12345"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_profile() {
    let app = test_app();
    signup(&app, "a@x.com", "secret1").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            json!({"email": "a@x.com", "password": "secret1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["data"]["accessToken"].as_str().unwrap();

    // The issued bearer token opens the protected profile route
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/profile")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_bad_logins_are_unauthorized() {
    let app = test_app();
    signup(&app, "a@x.com", "secret1").await;

    for payload in [
        json!({"email": "a@x.com", "password": "wrong-pass"}),
        json!({"email": "ghost@x.com", "password": "secret1"}),
    ] {
        let (status, body) =
            send(&app, json_request(Method::POST, "/api/auth/login", payload)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "AUTH_001");
    }
}

#[tokio::test]
async fn test_profile_requires_a_token() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/profile")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/profile")
        .header(header::AUTHORIZATION, "Bearer junk")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_refresh_rotates_and_consumes() {
    let app = test_app();
    let (access, refresh) = signup(&app, "a@x.com", "secret1").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/refresh",
            json!({"refreshToken": refresh}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_refresh = body["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(new_refresh, refresh);
    // Rotation never returns the user profile
    assert!(body["data"].get("user").is_none());

    // The consumed token is rejected on replay
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/refresh",
            json!({"refreshToken": refresh}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "AUTH_005");

    // An access token is the wrong kind at this endpoint
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/refresh",
            json!({"refreshToken": access}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "AUTH_004");

    // A missing token is a validation failure
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/auth/refresh", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_flows() {
    let app = test_app();
    let (access, refresh) = signup(&app, "a@x.com", "secret1").await;

    // Unauthenticated logout is rejected
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Targeted logout revokes the supplied refresh token
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"refreshToken": refresh}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/refresh",
            json!({"refreshToken": refresh}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Logout with no body revokes everything and is idempotent
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_fallback() {
    let app = test_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());

    let request = Request::builder()
        .uri("/no/such/route")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
