//! # HMAC-Derived Label Maps
//!
//! Derives each replacement label deterministically and irreversibly from
//! the canonical label under a caller-held key:
//!
//! ```text
//! replacement = "u" + base64url(HMAC(key, utf8(canonical_label)))
//! ```
//!
//! The same key and the same canonical labels always produce the same
//! replacements; without the key the canonical labels cannot be recovered.

use sdp_core::{CanonicalIdMap, LabelMap, LabelMapFactory, SdpError};

use crate::encoding::encode_multibase_base64url;
use crate::hmac::KeyedMac;

/// [`LabelMapFactory`] deriving replacement labels with a keyed MAC.
#[derive(Debug, Clone)]
pub struct HmacIdLabelMapFactory<M> {
    hmac: M,
}

impl<M: KeyedMac> HmacIdLabelMapFactory<M> {
    /// Wrap a keyed MAC.
    pub fn new(hmac: M) -> Self {
        Self { hmac }
    }

    /// The replacement label for one canonical label.
    pub fn replacement_label(&self, canonical_label: &str) -> String {
        encode_multibase_base64url(&self.hmac.sign(canonical_label.as_bytes()))
    }
}

impl<M: KeyedMac> LabelMapFactory for HmacIdLabelMapFactory<M> {
    fn create_label_map(&self, canonical_id_map: &CanonicalIdMap) -> Result<LabelMap, SdpError> {
        Ok(canonical_id_map
            .iter()
            .map(|(input, canonical)| (input.to_string(), self.replacement_label(canonical)))
            .collect())
    }
}

/// Create an HMAC-based label map factory.
pub fn create_hmac_id_label_map_function<M: KeyedMac>(hmac: M) -> HmacIdLabelMapFactory<M> {
    HmacIdLabelMapFactory::new(hmac)
}
