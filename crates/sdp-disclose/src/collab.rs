//! # Collaborator Boundaries
//!
//! The pipeline depends on two external collaborators, consumed through the
//! narrow async traits defined here:
//!
//! - [`Canonicalizer`]: graph canonicalization (RDFC-1.0 / URDNA2015),
//!   returning canonical N-Quads and the input → canonical blank node label
//!   map. Must be deterministic for a fixed input and honour
//!   [`TransformOptions::safe`] by rejecting malformed input.
//! - [`DocumentTransformer`]: JSON-LD expansion, compaction, framing and
//!   RDF conversion. Must preserve literal values verbatim.
//!
//! Collaborator errors are returned as [`BoxError`] and surfaced by the
//! pipeline as `CanonicalizationFailed` / `TransformFailed` without
//! interpretation.

use async_trait::async_trait;
use sdp_core::{BoxError, CanonicalIdMap, SdpError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options forwarded to collaborators.
///
/// `extra` carries collaborator-specific settings (document loader name,
/// frame flags, processing mode) verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Reject lossy or malformed input instead of guessing.
    #[serde(default = "default_safe")]
    pub safe: bool,
    /// Base IRI for relative IRI resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Collaborator-specific options.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_safe() -> bool {
    true
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            safe: true,
            base: None,
            extra: Map::new(),
        }
    }
}

impl TransformOptions {
    /// Build options from an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SdpError::InvalidArgument`] when `value` is not an object or
    /// has mistyped known fields.
    pub fn from_value(value: Value) -> Result<Self, SdpError> {
        if !value.is_object() {
            return Err(SdpError::InvalidArgument(
                "\"options\" must be an object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| SdpError::InvalidArgument(e.to_string()))
    }
}

/// Input to graph canonicalization.
#[derive(Debug, Clone, Copy)]
pub enum CanonicalizeInput<'a> {
    /// A JSON-LD document.
    Document(&'a Value),
    /// Already-serialized N-Quads.
    NQuads(&'a str),
}

/// Output of graph canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalOutput {
    /// Canonical N-Quads, one statement per line.
    pub nquads: String,
    /// Input blank node label → canonical label. Labels may or may not carry
    /// the `_:` prefix depending on the implementation.
    pub canonical_id_map: CanonicalIdMap,
}

/// Graph canonicalization collaborator.
#[async_trait]
pub trait Canonicalizer: Send + Sync {
    /// Canonicalize `input`, reporting the blank node label map.
    async fn canonicalize(
        &self,
        input: CanonicalizeInput<'_>,
        options: &TransformOptions,
    ) -> Result<CanonicalOutput, BoxError>;
}

/// JSON-LD structural transform collaborator.
#[async_trait]
pub trait DocumentTransformer: Send + Sync {
    /// Expand a document. The result is an expanded JSON-LD array.
    async fn expand(&self, document: &Value, options: &TransformOptions)
        -> Result<Value, BoxError>;

    /// Compact a document against `context`.
    async fn compact(
        &self,
        document: &Value,
        context: &Value,
        options: &TransformOptions,
    ) -> Result<Value, BoxError>;

    /// Frame a document with `frame`.
    async fn frame(
        &self,
        document: &Value,
        frame: &Value,
        options: &TransformOptions,
    ) -> Result<Value, BoxError>;

    /// Serialize a document to N-Quads.
    async fn to_nquads(&self, document: &Value, options: &TransformOptions)
        -> Result<String, BoxError>;

    /// Build an expanded document from N-Quads.
    async fn from_nquads(&self, nquads: &str, options: &TransformOptions)
        -> Result<Value, BoxError>;
}
