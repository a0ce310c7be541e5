//! Credential and session-token primitives
//!
//! Pure functions only, no HTTP framework dependencies. The axum
//! middleware that consumes these lives in launchkit-api.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of generated session tokens (hex characters)
const TOKEN_LEN: usize = 64;

/// Length of generated password salts (hex characters)
const SALT_LEN: usize = 32;

/// Hash a password with its salt: SHA-256 over `salt || password`,
/// returned as lowercase hex.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a plaintext password against a stored hash/salt pair.
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}

/// Generate a random password salt.
pub fn generate_salt() -> String {
    random_hex(SALT_LEN)
}

/// Generate an opaque session token.
pub fn generate_token() -> String {
    random_hex(TOKEN_LEN)
}

fn random_hex(len: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}
