// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router and request handlers.
//!
//! Thin plumbing over the engine: extract inputs, call the matching
//! engine operation, wrap the result in the response envelope. No auth
//! decisions are made here.
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::messages::{
    ApiResponse, AuthPayload, LoginRequest, LogoutRequest, ProfilePayload, RefreshRequest,
    SignupRequest, TokenPairPayload,
};
use crate::middleware::rate_limit;
use crate::store::AuthStore;
use crate::AppState;

/// Create the HTTP router
pub fn create_router<S: AuthStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/profile", get(profile))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::<S>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)
}

async fn signup<S: AuthStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.engine.signup(&req.email, req.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "User created successfully",
            AuthPayload {
                user: session.user,
                access_token: session.tokens.access_token,
                refresh_token: session.tokens.refresh_token,
            },
        )),
    ))
}

async fn login<S: AuthStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.engine.login(&req.email, req.password).await?;
    Ok(Json(ApiResponse::ok(
        "Login successful",
        AuthPayload {
            user: session.user,
            access_token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
        },
    )))
}

async fn refresh<S: AuthStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.engine.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(
        "Token refreshed successfully",
        TokenPairPayload {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        },
    )))
}

async fn logout<S: AuthStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let access_token = bearer_token(&headers)?;
    // The body is optional; an absent or malformed one means
    // logout-everywhere, matching the missing-field case
    let req: LogoutRequest = if body.is_empty() {
        LogoutRequest::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_default()
    };

    state
        .engine
        .logout(access_token, req.refresh_token.as_deref())
        .await?;
    Ok(Json(ApiResponse::message_only("Logout successful")))
}

async fn profile<S: AuthStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let access_token = bearer_token(&headers)?;
    let user = state.engine.authenticate(access_token).await?;
    Ok(Json(ApiResponse::ok("", ProfilePayload { user })))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "message": "Server is healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}
