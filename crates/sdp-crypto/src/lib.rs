//! # sdp-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks consumed by the pluggable
//! label-map and proof-hashing helpers:
//!
//! - **SHA-256** hashing behind the [`Hasher`] trait.
//! - **HMAC-SHA-256** keyed MACs behind the [`KeyedMac`] trait.
//! - **HMAC-derived label maps** ([`HmacIdLabelMapFactory`]) producing
//!   multibase base64url replacement labels.
//!
//! None of this is used by the partitioning logic itself.
//!
//! ## Crate Policy
//!
//! - Depends only on `sdp-core` internally.
//! - Key material never implements `Serialize` and is redacted in `Debug`.
//! - Tests use real primitives and published test vectors.

pub mod encoding;
pub mod hash;
pub mod hmac;
pub mod label;

pub use encoding::{decode_multibase_base64url, encode_multibase_base64url};
pub use hash::{sha256, sha256_hex, Hasher, Sha256Hasher};
pub use hmac::{HmacKey, KeyedMac};
pub use label::{create_hmac_id_label_map_function, HmacIdLabelMapFactory};
