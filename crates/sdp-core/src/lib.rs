#![deny(missing_docs)]
//! # sdp-core — Foundational Types for Selective Disclosure
//!
//! This crate is the leaf of the workspace. It defines the types every other
//! crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Statements are parsed, not pattern-matched.** Blank node rewriting
//!    goes through [`statement::Quad`], whose subject/predicate/object/graph
//!    slots are explicit. A literal that merely *looks* like a blank node
//!    label is never rewritten.
//!
//! 2. **Three label namespaces, three types.** Input, canonical and
//!    replacement labels only meet through [`CanonicalIdMap`] and
//!    [`LabelMap`]; replacement labels come from a [`LabelMapFactory`].
//!
//! 3. **Multisets, not sets.** Repeated statements are tracked by count
//!    ([`StatementMultiset`]) and reported by original position
//!    ([`IndexedStatements`]).
//!
//! 4. **Code-point ordering.** Statement sorting is `str` ordering, which is
//!    Unicode code-point order.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sdp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod group;
pub mod label;
pub mod pointer;
pub mod statement;

// Re-export primary types for ergonomic imports.
pub use error::{BoxError, CryptoError, SdpError, StatementError};
pub use group::{partition, partition_by, GroupResult, IndexedStatements, StatementMultiset};
pub use label::{
    create_label_map_function, strip_blank_node_prefixes, CanonicalIdMap, ExplicitLabelMapFactory,
    LabelMap, LabelMapFactory,
};
pub use pointer::{parse_pointer, Pointer, PointerStep};
pub use statement::{
    deskolemize_statements, relabel_blank_nodes, skolemize_statements, sort_statements,
    split_statements, Literal, LiteralAnnotation, Quad, Term, BLANK_NODE_PREFIX,
    DEFAULT_SKOLEM_PREFIX,
};
