//! # Label-Replacing Canonicalization
//!
//! Canonicalizes a document or statement list, then replaces every canonical
//! blank node label with one chosen by a [`LabelMapFactory`]. Only the
//! replacement labels leave this module: the canonical labels are an
//! intermediate artifact.
//!
//! ## Procedure
//!
//! 1. Canonicalize; strip `_:` from the reported input → canonical map.
//! 2. Ask the factory for input → replacement labels.
//! 3. Derive canonical → replacement and rewrite the canonical statements
//!    through it, one parsed statement at a time.
//! 4. Sort the rewritten statements in code-point order.
//! 5. Report input → replacement for every input label the canonicalizer saw.

use std::sync::Arc;

use sdp_core::{
    relabel_blank_nodes, sort_statements, split_statements, strip_blank_node_prefixes, LabelMap,
    LabelMapFactory, SdpError,
};
use serde::{Deserialize, Serialize};

use crate::collab::{CanonicalOutput, CanonicalizeInput, Canonicalizer, TransformOptions};

/// Canonicalize `input`, mapping collaborator failures to
/// [`SdpError::CanonicalizationFailed`].
pub async fn canonicalize(
    canonicalizer: &dyn Canonicalizer,
    input: CanonicalizeInput<'_>,
    options: &TransformOptions,
) -> Result<CanonicalOutput, SdpError> {
    let output = canonicalizer
        .canonicalize(input, options)
        .await
        .map_err(SdpError::CanonicalizationFailed)?;
    tracing::debug!(
        labels = output.canonical_id_map.len(),
        "canonicalized input"
    );
    Ok(output)
}

/// Output of label-replacing canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelReplacement {
    /// Canonical statements relabelled with replacement labels, sorted.
    #[serde(rename = "nquads")]
    pub statements: Vec<String>,
    /// Input label → replacement label.
    pub label_map: LabelMap,
}

/// Canonicalization with caller-chosen blank node labels.
#[derive(Clone)]
pub struct LabelReplacingCanonicalizer {
    canonicalizer: Arc<dyn Canonicalizer>,
    options: TransformOptions,
}

impl std::fmt::Debug for LabelReplacingCanonicalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelReplacingCanonicalizer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl LabelReplacingCanonicalizer {
    /// Bind a canonicalizer and the options passed to it on every call.
    pub fn new(canonicalizer: Arc<dyn Canonicalizer>, options: TransformOptions) -> Self {
        Self {
            canonicalizer,
            options,
        }
    }

    /// The bound canonicalizer.
    pub fn canonicalizer(&self) -> &dyn Canonicalizer {
        self.canonicalizer.as_ref()
    }

    /// The bound options.
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Canonicalize `input` and replace its blank node labels.
    ///
    /// # Errors
    ///
    /// - [`SdpError::CanonicalizationFailed`] when the canonicalizer fails.
    /// - [`SdpError::UnmappedLabel`] when the factory's map does not cover
    ///   exactly the canonicalizer's input labels, or a canonical statement
    ///   carries a label the canonicalizer did not report.
    /// - Whatever the factory itself returns.
    #[tracing::instrument(skip_all)]
    pub async fn replace_labels(
        &self,
        input: CanonicalizeInput<'_>,
        factory: &dyn LabelMapFactory,
    ) -> Result<LabelReplacement, SdpError> {
        let output = canonicalize(self.canonicalizer.as_ref(), input, &self.options).await?;
        let canonical_id_map = strip_blank_node_prefixes(output.canonical_id_map);
        let replacements = factory.create_label_map(&canonical_id_map)?;

        let mut canonical_to_replacement = LabelMap::new();
        for (input_label, replacement) in replacements.iter() {
            let canonical = canonical_id_map
                .get(input_label)
                .ok_or_else(|| SdpError::UnmappedLabel(input_label.to_string()))?;
            canonical_to_replacement.insert(canonical, replacement);
        }

        let mut statements =
            relabel_blank_nodes(&split_statements(&output.nquads), &canonical_to_replacement)?;
        sort_statements(&mut statements);

        let label_map = canonical_id_map
            .keys()
            .map(|input_label| {
                replacements
                    .get(input_label)
                    .map(|replacement| (input_label.to_string(), replacement.to_string()))
                    .ok_or_else(|| SdpError::UnmappedLabel(input_label.to_string()))
            })
            .collect::<Result<LabelMap, _>>()?;

        tracing::debug!(
            statements = statements.len(),
            labels = label_map.len(),
            "replaced canonical labels"
        );
        Ok(LabelReplacement {
            statements,
            label_map,
        })
    }

    /// Label-replacing canonicalization of a JSON-LD document.
    pub async fn canonicalize_document(
        &self,
        document: &serde_json::Value,
        factory: &dyn LabelMapFactory,
    ) -> Result<LabelReplacement, SdpError> {
        self.replace_labels(CanonicalizeInput::Document(document), factory)
            .await
    }

    /// Label-replacing canonicalization of a statement list.
    pub async fn canonicalize_statements(
        &self,
        statements: &[String],
        factory: &dyn LabelMapFactory,
    ) -> Result<LabelReplacement, SdpError> {
        let nquads = statements.concat();
        self.replace_labels(CanonicalizeInput::NQuads(&nquads), factory)
            .await
    }
}
