//! # Filtering and Grouping
//!
//! Partitions statement lists by what JSON-LD frames (or JSON pointers)
//! select, and drives the full canonicalize-and-group pipeline used to
//! build selective-disclosure proofs.
//!
//! Frame evaluation works on a skolemized copy of the statements so that
//! blank nodes survive framing; matched statements are deskolemized again
//! before comparison. Per-frame and per-group work runs concurrently and is
//! joined before results are assembled, so output never depends on
//! completion order.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use sdp_core::{
    partition, partition_by, relabel_blank_nodes, strip_blank_node_prefixes, GroupResult,
    IndexedStatements, LabelMap, LabelMapFactory, SdpError, StatementMultiset,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonicalize::{canonicalize, LabelReplacingCanonicalizer};
use crate::collab::{CanonicalizeInput, Canonicalizer, DocumentTransformer, TransformOptions};
use crate::frame::{pointers_to_frames, FrameSelection};
use crate::select::{select, SelectOptions};
use crate::skolem::{Skolemized, Skolemizer};

/// Selection of canonical statements by JSON pointers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedStatements {
    /// The selected JSON-LD document, `None` when nothing was selected.
    pub selection: Option<Value>,
    /// Statements of the selection with blank nodes restored.
    #[serde(rename = "deskolemizedNQuads")]
    pub deskolemized: Vec<String>,
    /// The same statements relabelled through the label map.
    #[serde(rename = "nquads")]
    pub statements: Vec<String>,
}

/// Result of [`Grouper::filter_and_group`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAndGroupResult {
    /// Grouping of the filtered statements.
    pub filtered: GroupResult,
    /// Canonical label → input label for the filtered statements.
    pub label_map: LabelMap,
    /// Original statements in the matching group, by original position.
    pub matching: IndexedStatements,
    /// Original statements in the non-matching group, by original position.
    pub non_matching: IndexedStatements,
}

/// One named group of [`Grouper::canonicalize_and_group`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOutcome {
    /// Canonical statements selected by the group's pointers.
    pub matching: IndexedStatements,
    /// Every other canonical statement.
    pub non_matching: IndexedStatements,
    /// The group's selection before relabelling.
    #[serde(rename = "deskolemizedNQuads")]
    pub deskolemized: Vec<String>,
}

/// Result of [`Grouper::canonicalize_and_group`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalizedGroups {
    /// Per-group partitions, keyed by group name.
    pub groups: BTreeMap<String, GroupOutcome>,
    /// Skolemized forms of the input document.
    pub skolemized: Skolemized,
    /// Deskolemized statements of the whole document.
    #[serde(rename = "deskolemizedNQuads")]
    pub deskolemized: Vec<String>,
    /// Input label → replacement label.
    pub label_map: LabelMap,
    /// Canonical statements with replacement labels, sorted.
    #[serde(rename = "nquads")]
    pub statements: Vec<String>,
}

/// Statement grouping bound to its collaborators.
#[derive(Debug, Clone)]
pub struct Grouper {
    skolemizer: Skolemizer,
    replacer: LabelReplacingCanonicalizer,
    select_options: SelectOptions,
}

impl Grouper {
    /// Grouper over the given collaborators, with the default skolem prefix
    /// and select options.
    pub fn new(
        canonicalizer: Arc<dyn Canonicalizer>,
        transformer: Arc<dyn DocumentTransformer>,
        options: TransformOptions,
    ) -> Self {
        Self {
            skolemizer: Skolemizer::new(transformer, options.clone()),
            replacer: LabelReplacingCanonicalizer::new(canonicalizer, options),
            select_options: SelectOptions::default(),
        }
    }

    /// Override the skolem prefix.
    pub fn with_skolem_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skolemizer = self.skolemizer.with_prefix(prefix);
        self
    }

    /// Override pointer selection options.
    pub fn with_select_options(mut self, options: SelectOptions) -> Self {
        self.select_options = options;
        self
    }

    /// The bound skolemizer.
    pub fn skolemizer(&self) -> &Skolemizer {
        &self.skolemizer
    }

    /// The bound label-replacing canonicalizer.
    pub fn replacer(&self) -> &LabelReplacingCanonicalizer {
        &self.replacer
    }

    fn options(&self) -> &TransformOptions {
        self.skolemizer.options()
    }

    /// Statements matched by `frames`.
    ///
    /// The union over frames keeps, for each statement, the largest number
    /// of times any single frame matched it.
    #[tracing::instrument(skip_all, fields(statements = statements.len()))]
    pub async fn filter(
        &self,
        statements: &[String],
        frames: &FrameSelection,
    ) -> Result<Vec<String>, SdpError> {
        let frames = match frames {
            FrameSelection::Nothing => return Ok(Vec::new()),
            FrameSelection::Everything => return Ok(statements.to_vec()),
            FrameSelection::Frames(frames) => frames,
        };

        let skolemized = self.skolemizer.skolemize_statements(statements)?;
        let transformer = self.skolemizer.transformer();
        let document = transformer
            .from_nquads(&skolemized.concat(), self.options())
            .await
            .map_err(SdpError::TransformFailed)?;

        let matched = try_join_all(frames.iter().map(|frame| {
            let document = &document;
            async move {
                let framed = transformer
                    .frame(document, frame, self.options())
                    .await
                    .map_err(SdpError::TransformFailed)?;
                self.skolemizer.to_deskolemized_statements(&framed).await
            }
        }))
        .await?;

        let mut union = StatementMultiset::default();
        for statements in matched {
            union.union_max(&StatementMultiset::from_statements(statements));
        }
        tracing::debug!(frames = frames.len(), matched = union.len(), "filtered statements");
        Ok(union.into_sorted_statements())
    }

    /// Partition `statements` by what `frames` select.
    pub async fn group(
        &self,
        statements: &[String],
        frames: &FrameSelection,
    ) -> Result<GroupResult, SdpError> {
        let selected = self.filter(statements, frames).await?;
        Ok(partition(statements, &selected))
    }

    /// Partition `statements` by what `pointers` select in `document`.
    ///
    /// `None` selects nothing and `Some([])` selects everything.
    pub async fn group_by_pointers(
        &self,
        statements: &[String],
        document: &Value,
        pointers: Option<&[String]>,
    ) -> Result<GroupResult, SdpError> {
        let frames = match pointers {
            None => FrameSelection::Nothing,
            Some([]) => FrameSelection::Everything,
            Some(pointers) => pointers_to_frames(document, pointers, self.select_options)?,
        };
        self.group(statements, &frames).await
    }

    /// Filter `statements`, then canonicalize and group the filtered subset.
    ///
    /// The canonical label map is reported reversed (canonical → input) with
    /// `_:` prefixes removed. `matching` / `non_matching` are re-expressed
    /// over the original `statements`, one occurrence per filtered match.
    #[tracing::instrument(skip_all, fields(statements = statements.len()))]
    pub async fn filter_and_group(
        &self,
        statements: &[String],
        filter_frames: &FrameSelection,
        group_frames: &FrameSelection,
    ) -> Result<FilterAndGroupResult, SdpError> {
        let filtered = self.filter(statements, filter_frames).await?;
        let nquads = filtered.concat();

        let (canonical, grouped) = futures::try_join!(
            canonicalize(
                self.replacer.canonicalizer(),
                CanonicalizeInput::NQuads(&nquads),
                self.options(),
            ),
            self.group(&filtered, group_frames),
        )?;

        let label_map = strip_blank_node_prefixes(canonical.canonical_id_map)
            .into_iter()
            .map(|(input, canonical)| (canonical, input))
            .collect();

        let matched = partition_by(
            statements,
            StatementMultiset::from_statements(grouped.matching.values().cloned()),
        );
        let mut non_matching_available =
            StatementMultiset::from_statements(grouped.non_matching.values().cloned());
        let non_matching = matched
            .non_matching
            .into_iter()
            .filter(|(_, statement)| non_matching_available.consume(statement))
            .collect();

        Ok(FilterAndGroupResult {
            filtered: grouped,
            label_map,
            matching: matched.matching,
            non_matching,
        })
    }

    /// Select from a skolemized compact document and relabel the selection
    /// with `label_map`.
    pub async fn select_canonical_statements(
        &self,
        document: &Value,
        pointers: &[String],
        label_map: &LabelMap,
    ) -> Result<SelectedStatements, SdpError> {
        let Some(selection) = select(document, pointers, self.select_options)? else {
            return Ok(SelectedStatements::default());
        };
        let deskolemized = self.skolemizer.to_deskolemized_statements(&selection).await?;
        let statements = relabel_blank_nodes(&deskolemized, label_map)?;
        Ok(SelectedStatements {
            selection: Some(selection),
            deskolemized,
            statements,
        })
    }

    /// Skolemize, canonicalize with replacement labels, and partition the
    /// canonical statements once per named pointer group.
    ///
    /// A group of `None` selects nothing; `Some([])` selects everything.
    #[tracing::instrument(skip_all, fields(groups = groups.len()))]
    pub async fn canonicalize_and_group(
        &self,
        document: &Value,
        factory: &dyn LabelMapFactory,
        groups: &BTreeMap<String, Option<Vec<String>>>,
    ) -> Result<CanonicalizedGroups, SdpError> {
        let skolemized = self.skolemizer.skolemize(document).await?;
        let deskolemized = self
            .skolemizer
            .to_deskolemized_statements(&skolemized.expanded)
            .await?;
        let replaced = self
            .replacer
            .canonicalize_statements(&deskolemized, factory)
            .await?;

        let selections = try_join_all(groups.iter().map(|(name, pointers)| {
            let compact = &skolemized.compact;
            let label_map = &replaced.label_map;
            let all = &replaced.statements;
            let deskolemized = &deskolemized;
            async move {
                let selected = match pointers.as_deref() {
                    None => SelectedStatements::default(),
                    Some([]) => SelectedStatements {
                        selection: Some(compact.clone()),
                        deskolemized: deskolemized.clone(),
                        statements: all.clone(),
                    },
                    Some(pointers) => {
                        self.select_canonical_statements(compact, pointers, label_map)
                            .await?
                    }
                };
                Ok::<_, SdpError>((name.clone(), selected))
            }
        }))
        .await?;

        let groups = selections
            .into_iter()
            .map(|(name, selected)| {
                let GroupResult {
                    matching,
                    non_matching,
                } = partition_by(
                    &replaced.statements,
                    StatementMultiset::from_statements(selected.statements),
                );
                let outcome = GroupOutcome {
                    matching,
                    non_matching,
                    deskolemized: selected.deskolemized,
                };
                (name, outcome)
            })
            .collect();

        tracing::debug!(
            statements = replaced.statements.len(),
            "canonicalized and grouped document"
        );
        Ok(CanonicalizedGroups {
            groups,
            skolemized,
            deskolemized,
            label_map: replaced.label_map,
            statements: replaced.statements,
        })
    }
}
