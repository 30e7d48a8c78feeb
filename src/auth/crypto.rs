//! # Credential Hashing
//!
//! Salted SHA-256 digests with constant-time comparison. Passwords are
//! only ever stored as `sha256(salt || password)` hex alongside their
//! per-user salt.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Bytes of random salt per user.
const SALT_LEN: usize = 16;

/// Generate a fresh random salt, hex-encoded.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

/// Hash a password with its salt, hex-encoded.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex_encode(&hasher.finalize())
}

/// Constant-time comparison of a candidate password against the stored
/// digest.
pub fn verify_password(salt: &str, password: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(salt, password);
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic_per_salt() {
        let a = hash_password("00ff", "secret");
        let b = hash_password("00ff", "secret");
        let c = hash_password("11ee", "secret");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_verify_round_trip() {
        let salt = generate_salt();
        let hash = hash_password(&salt, "online12");
        assert!(verify_password(&salt, "online12", &hash));
        assert!(!verify_password(&salt, "online13", &hash));
        assert!(!verify_password("other", "online12", &hash));
    }

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
        assert_eq!(generate_salt().len(), SALT_LEN * 2);
    }
}
