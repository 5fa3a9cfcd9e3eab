//! # SHA-256 Hashing
//!
//! The default [`Hasher`] for proof and mandatory-statement hashing.
//! Statements are hashed as their UTF-8 bytes.

use sha2::{Digest, Sha256};

/// Hash primitive: bytes in, digest bytes out.
pub trait Hasher: Send + Sync {
    /// Hash `data`.
    fn hash(&self, data: &[u8]) -> Vec<u8>;
}

/// SHA-256 [`Hasher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, data: &[u8]) -> Vec<u8> {
        sha256(data).to_vec()
    }
}

/// Compute a raw SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    bytes
}

/// Compute a SHA-256 digest rendered as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    to_hex(&sha256(data))
}

/// Render bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
