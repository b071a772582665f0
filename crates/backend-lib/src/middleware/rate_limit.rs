// crates/backend-lib/src/middleware/rate_limit.rs

//! Fixed-window per-client rate limiting.
use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::store::AuthStore;
use crate::AppState;

/// Rate limiter middleware
pub async fn rate_limit<S: AuthStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Get client IP
    let client_ip = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown");

    let max_requests = state.settings.rate_limit.max_requests;
    let window = Duration::from_secs(state.settings.rate_limit.window_secs);

    // Get or create rate limit entry
    let mut entry = state
        .rate_limits
        .entry(client_ip.to_string())
        .or_insert_with(|| RateLimitEntry {
            requests: 0,
            window_start: Instant::now(),
        });

    // Check if window has expired
    if entry.window_start.elapsed() > window {
        entry.requests = 0;
        entry.window_start = Instant::now();
    }

    // Check if rate limit exceeded
    if entry.requests >= max_requests {
        return Err(AppError::RateLimitExceeded);
    }

    entry.requests += 1;
    drop(entry);

    Ok(next.run(request).await)
}

/// Rate limit entry for a client
#[derive(Debug)]
pub struct RateLimitEntry {
    requests: u32,
    window_start: Instant,
}
