// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP_TOTAL: &str = "auth.signup";
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const TOKEN_REFRESHED: &str = "auth.token.refreshed";
pub const TOKEN_REVOKED: &str = "auth.token.revoked";
