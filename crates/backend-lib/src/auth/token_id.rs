// ============================
// crates/backend-lib/src/auth/token_id.rs
// ============================
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
/** Unique token id (`jti`) generation.
Two tokens minted for the same user within the same second would
otherwise be identical strings; the `jti` claim makes every minted
token unique, which the refresh-token ledger relies on. */
use rand::{rngs::OsRng, RngCore};

/// Token id size in bytes (32 bytes = 256 bits of entropy)
const TOKEN_ID_BYTES: usize = 32;

/** Generate a unique token id from OS-provided entropy.
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_token_id() -> String {
    let mut buffer = [0u8; TOKEN_ID_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
