//! # sdp-disclose — Selective Disclosure Transformation Pipeline
//!
//! Turns a JSON-LD document into canonical N-Quads statements with
//! caller-chosen blank node labels, then partitions those statements into
//! groups selected by JSON pointers.
//!
//! ## Pipeline
//!
//! ```text
//! document ──skolemize──▶ skolemized (expanded + compact)
//!    expanded ──to N-Quads, deskolemize──▶ statements
//!    statements ──canonicalize, replace labels──▶ canonical statements + label map
//!    compact ──select(pointers), relabel──▶ selected canonical statements
//!    canonical statements ──partition(selected)──▶ matching / non-matching
//! ```
//!
//! ## Collaborators
//!
//! JSON-LD processing and graph canonicalization are supplied by the caller
//! through [`DocumentTransformer`] and [`Canonicalizer`]. Replacement labels
//! come from a [`sdp_core::LabelMapFactory`], for example
//! [`sdp_crypto::HmacIdLabelMapFactory`].
//!
//! ## Crate Policy
//!
//! - Inputs are never mutated; every stage returns new values.
//! - Concurrent per-frame and per-group work is joined before results are
//!   assembled.
//! - No `.unwrap()` outside tests.

pub mod canonicalize;
pub mod collab;
pub mod document;
pub mod frame;
pub mod group;
pub mod proof;
pub mod select;
pub mod skolem;

pub use canonicalize::{canonicalize, LabelReplacement, LabelReplacingCanonicalizer};
pub use collab::{
    CanonicalOutput, CanonicalizeInput, Canonicalizer, DocumentTransformer, TransformOptions,
};
pub use document::ExpandedElement;
pub use frame::{pointers_to_frames, FrameSelection};
pub use group::{
    CanonicalizedGroups, FilterAndGroupResult, GroupOutcome, Grouper, SelectedStatements,
};
pub use proof::{canonize_proof, hash_canonized_proof, hash_mandatory};
pub use select::{select, SelectOptions};
pub use skolem::{skolemize_expanded, SkolemLabeler, Skolemized, Skolemizer};
