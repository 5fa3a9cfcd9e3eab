//! # sdp-cli — Selective Disclosure Command-Line Interface
//!
//! Exposes the synchronous primitives of the workspace for scripting and
//! debugging. JSON-LD processing and canonicalization need external
//! collaborators and are not offered here.
//!
//! ## Subcommands
//!
//! - `pointer`: parse a JSON pointer into its steps
//! - `select`: select a JSON document by pointers
//! - `frames`: convert pointers into JSON-LD frames
//! - `skolemize` / `deskolemize`: rewrite blank nodes in N-Quads
//! - `relabel`: rewrite blank node labels through a label map
//! - `hmac-labels`: derive HMAC replacement labels for a canonical id map
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers write to a caller-supplied writer so they can be tested.
//! - Diagnostics go to stderr through `tracing`; results go to stdout.

pub mod input;
pub mod labels;
pub mod pointer;
pub mod statements;
