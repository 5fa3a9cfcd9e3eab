//! Proof configuration canonicalization and hashing.

use sdp_core::SdpError;
use sdp_crypto::Hasher;
use serde_json::{Map, Value};

use crate::canonicalize::canonicalize;
use crate::collab::{CanonicalizeInput, Canonicalizer, TransformOptions};
use crate::document::CONTEXT;

/// Proof field excluded from canonicalization.
pub const PROOF_VALUE: &str = "proofValue";

/// Canonicalize a proof configuration under the document's `@context`.
///
/// The proof is canonicalized without its `proofValue`. A proof carrying its
/// own `@context` keeps it.
///
/// # Errors
///
/// [`SdpError::InvalidArgument`] when `proof` is not an object;
/// [`SdpError::CanonicalizationFailed`] on collaborator failure.
pub async fn canonize_proof(
    canonicalizer: &dyn Canonicalizer,
    document: &Value,
    proof: &Value,
    options: &TransformOptions,
) -> Result<String, SdpError> {
    let proof = proof
        .as_object()
        .ok_or_else(|| SdpError::InvalidArgument("\"proof\" must be an object".to_string()))?;

    let mut config = Map::new();
    if let Some(context) = document.get(CONTEXT) {
        config.insert(CONTEXT.to_string(), context.clone());
    }
    for (key, value) in proof {
        if key != PROOF_VALUE {
            config.insert(key.clone(), value.clone());
        }
    }

    let config = Value::Object(config);
    let output = canonicalize(canonicalizer, CanonicalizeInput::Document(&config), options).await?;
    Ok(output.nquads)
}

/// Hash the canonical proof configuration.
pub async fn hash_canonized_proof(
    canonicalizer: &dyn Canonicalizer,
    document: &Value,
    proof: &Value,
    options: &TransformOptions,
    hasher: &dyn Hasher,
) -> Result<Vec<u8>, SdpError> {
    let canonized = canonize_proof(canonicalizer, document, proof, options).await?;
    Ok(hasher.hash(canonized.as_bytes()))
}

/// Hash the concatenation of the mandatory statements, in the given order.
pub fn hash_mandatory(mandatory: &[String], hasher: &dyn Hasher) -> Vec<u8> {
    hasher.hash(mandatory.concat().as_bytes())
}
