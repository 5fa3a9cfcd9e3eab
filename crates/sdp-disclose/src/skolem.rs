//! # Skolemization
//!
//! Blank nodes have no stable identity across transformations. Skolemization
//! replaces each blank node with an IRI under a reserved prefix
//! (`urn:bnid:` by default) so that compaction, framing and selection keep
//! node identity; deskolemization reverses it at the statement level.
//!
//! - A blank node that already carries a label `_:x` becomes `{prefix}x`, so
//!   shared references keep pointing at the same node.
//! - An unlabelled node object receives `{prefix}_{salt}_{n}`, where the salt
//!   is a fresh UUID per labeler and `n` counts up from zero.
//! - Literals and `@value` objects are never touched.

use std::sync::Arc;

use sdp_core::{
    deskolemize_statements, skolemize_statements, split_statements, SdpError,
    BLANK_NODE_PREFIX, DEFAULT_SKOLEM_PREFIX,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::collab::{DocumentTransformer, TransformOptions};
use crate::document::{ExpandedElement, CONTEXT, ID};

/// Fresh skolem id generator: `{prefix}_{salt}_{count}`.
#[derive(Debug, Clone)]
pub struct SkolemLabeler {
    prefix: String,
    salt: String,
    count: u64,
}

impl SkolemLabeler {
    /// Labeler with a random UUID salt.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_salt(prefix, Uuid::new_v4().to_string())
    }

    /// Labeler with a fixed salt.
    pub fn with_salt(prefix: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            salt: salt.into(),
            count: 0,
        }
    }

    /// The skolem IRI prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Mint the next fresh skolem id.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{}_{}", self.prefix, self.salt, self.count);
        self.count += 1;
        id
    }

    /// Skolemize an identifier: blank labels are embedded, IRIs pass through.
    pub fn embed(&self, id: &str) -> String {
        match id.strip_prefix(BLANK_NODE_PREFIX) {
            Some(label) => format!("{}{label}", self.prefix),
            None => id.to_string(),
        }
    }
}

impl Default for SkolemLabeler {
    fn default() -> Self {
        Self::new(DEFAULT_SKOLEM_PREFIX)
    }
}

/// Give every node object in an expanded document a skolem `@id`.
///
/// `expanded` is an expanded JSON-LD element (normally the top-level array).
/// The input is not modified.
pub fn skolemize_expanded(expanded: &Value, labeler: &mut SkolemLabeler) -> Value {
    match ExpandedElement::classify(expanded) {
        ExpandedElement::Literal(value) => value.clone(),
        ExpandedElement::Reference(id) => {
            let mut node = Map::new();
            node.insert(ID.to_string(), Value::String(labeler.embed(id)));
            Value::Object(node)
        }
        ExpandedElement::Node(map) => {
            let mut node = skolemize_properties(map, labeler);
            let id = match map.get(ID) {
                Some(Value::String(id)) => labeler.embed(id),
                Some(_) | None => labeler.next_id(),
            };
            node.insert(ID.to_string(), Value::String(id));
            Value::Object(node)
        }
        ExpandedElement::Container(map) => Value::Object(skolemize_properties(map, labeler)),
        ExpandedElement::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| skolemize_expanded(item, labeler))
                .collect(),
        ),
    }
}

fn skolemize_properties(map: &Map<String, Value>, labeler: &mut SkolemLabeler) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| key.as_str() != ID)
        .map(|(key, value)| (key.clone(), skolemize_expanded(value, labeler)))
        .collect()
}

/// Expanded and compact forms of a skolemized document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skolemized {
    /// Skolemized expanded form.
    pub expanded: Value,
    /// Skolemized form compacted against the input's own `@context`.
    pub compact: Value,
}

/// Skolemization bound to a document transformer.
#[derive(Clone)]
pub struct Skolemizer {
    transformer: Arc<dyn DocumentTransformer>,
    options: TransformOptions,
    prefix: String,
}

impl std::fmt::Debug for Skolemizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skolemizer")
            .field("options", &self.options)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Skolemizer {
    /// Skolemizer using the default `urn:bnid:` prefix.
    pub fn new(transformer: Arc<dyn DocumentTransformer>, options: TransformOptions) -> Self {
        Self {
            transformer,
            options,
            prefix: DEFAULT_SKOLEM_PREFIX.to_string(),
        }
    }

    /// Override the skolem prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The skolem IRI prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The bound transformer.
    pub fn transformer(&self) -> &dyn DocumentTransformer {
        self.transformer.as_ref()
    }

    /// The bound options.
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Skolemize a compact JSON-LD document.
    ///
    /// # Errors
    ///
    /// [`SdpError::InvalidArgument`] when `document` is not an object with an
    /// `@context`; [`SdpError::TransformFailed`] when expansion or compaction
    /// fails.
    #[tracing::instrument(skip_all, fields(prefix = %self.prefix))]
    pub async fn skolemize(&self, document: &Value) -> Result<Skolemized, SdpError> {
        let context = document
            .as_object()
            .and_then(|map| map.get(CONTEXT))
            .filter(|context| !context.is_null())
            .ok_or_else(|| {
                SdpError::InvalidArgument(
                    "\"document\" must be a compact JSON-LD object with an \"@context\""
                        .to_string(),
                )
            })?;

        let expanded = self
            .transformer
            .expand(document, &self.options)
            .await
            .map_err(SdpError::TransformFailed)?;

        let mut labeler = SkolemLabeler::new(self.prefix.clone());
        let expanded = skolemize_expanded(&expanded, &mut labeler);

        let compact = self
            .transformer
            .compact(&expanded, context, &self.options)
            .await
            .map_err(SdpError::TransformFailed)?;

        tracing::debug!("skolemized document");
        Ok(Skolemized { expanded, compact })
    }

    /// Serialize a (skolemized) document to N-Quads and deskolemize them.
    ///
    /// # Errors
    ///
    /// [`SdpError::TransformFailed`] when serialization fails.
    pub async fn to_deskolemized_statements(&self, document: &Value) -> Result<Vec<String>, SdpError> {
        let nquads = self
            .transformer
            .to_nquads(document, &self.options)
            .await
            .map_err(SdpError::TransformFailed)?;
        self.deskolemize_statements(&split_statements(&nquads))
    }

    /// Skolemize blank node labels in statements under this prefix.
    pub fn skolemize_statements(&self, statements: &[String]) -> Result<Vec<String>, SdpError> {
        skolemize_statements(statements, &self.prefix)
    }

    /// Deskolemize statements under this prefix.
    pub fn deskolemize_statements(&self, statements: &[String]) -> Result<Vec<String>, SdpError> {
        deskolemize_statements(statements, &self.prefix)
    }
}
