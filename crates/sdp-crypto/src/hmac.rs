//! # HMAC-SHA-256 Keyed MAC
//!
//! The keyed MAC behind HMAC-derived blank node labels.
//!
//! ## Security Invariant
//!
//! [`HmacKey`] does not implement `Serialize` and its `Debug` output is
//! redacted. Key bytes never reach logs or serialized artifacts.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sdp_core::CryptoError;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Keyed MAC primitive: bytes in, MAC bytes out.
pub trait KeyedMac: Send + Sync {
    /// Compute the MAC of `data`.
    fn sign(&self, data: &[u8]) -> Vec<u8>;
}

/// An HMAC-SHA-256 secret key, held as a keyed MAC state.
#[derive(Clone)]
pub struct HmacKey {
    mac: HmacSha256,
}

impl HmacKey {
    /// Wrap raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyError`] for an empty key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() {
            return Err(CryptoError::KeyError("HMAC key must not be empty".to_string()));
        }
        let mac = HmacSha256::new_from_slice(bytes)
            .map_err(|e| CryptoError::KeyError(format!("invalid HMAC key: {e}")))?;
        Ok(Self { mac })
    }

    /// Parse a key from a hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_to_bytes(hex.trim()).map_err(CryptoError::KeyError)?;
        Self::from_bytes(&bytes)
    }

    /// Generate a random 32-byte key.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut key = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut key);
        Self::from_bytes(&key)
    }

    /// Compute HMAC-SHA-256 over `data`.
    pub fn mac(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = self.mac.clone();
        mac.update(data);
        let tag = mac.finalize().into_bytes();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&tag);
        bytes
    }
}

impl KeyedMac for HmacKey {
    fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.mac(data).to_vec()
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HmacKey(<private>)")
    }
}

fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .ok_or_else(|| format!("invalid hex at position {i}"))
                .and_then(|pair| {
                    u8::from_str_radix(pair, 16)
                        .map_err(|e| format!("invalid hex at position {i}: {e}"))
                })
        })
        .collect()
}
