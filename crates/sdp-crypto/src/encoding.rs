//! # Multibase base64url
//!
//! Replacement labels derived from MACs are written as multibase base64url
//! (`u` prefix, no padding). The prefix letter makes the label a legal
//! N-Quads blank node label even when the encoding starts with `-` or `_`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sdp_core::CryptoError;

/// Multibase prefix for base64url without padding.
pub const MULTIBASE_BASE64URL: char = 'u';

/// Encode bytes as multibase base64url.
pub fn encode_multibase_base64url(bytes: &[u8]) -> String {
    format!("{MULTIBASE_BASE64URL}{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Decode a multibase base64url string.
///
/// # Errors
///
/// Returns [`CryptoError::DecodeError`] on a missing `u` prefix or invalid
/// base64url body.
pub fn decode_multibase_base64url(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let body = encoded.strip_prefix(MULTIBASE_BASE64URL).ok_or_else(|| {
        CryptoError::DecodeError(format!("expected multibase prefix 'u' in {encoded:?}"))
    })?;
    URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|e| CryptoError::DecodeError(e.to_string()))
}
