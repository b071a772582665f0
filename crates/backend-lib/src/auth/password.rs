// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};
use zeroize::Zeroize;

/// One-way salted password hasher with a configurable cost factor.
///
/// The cost is embedded in the PHC hash string, so verification infers
/// it from the hash rather than from this hasher's configuration; a
/// hash minted at one cost still verifies after the cost is changed.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with the given cost factor.
    pub fn new(cost: u8) -> anyhow::Result<Self> {
        let params = Params::new(cost, 8, 1, Params::RECOMMENDED_LEN)
            .map_err(|e| anyhow::anyhow!("invalid hash cost {cost}: {e}"))?;
        Ok(Self { params })
    }

    /// Hash a password
    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a hash
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }

    /// Hash a password and zeroize the plaintext
    pub fn hash_secure(&self, plain: &mut String) -> anyhow::Result<String> {
        let hash = self.hash(plain);
        plain.zeroize();
        hash
    }
}
