//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the selective-disclosure stack.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every failure is typed and surfaced immediately. Nothing is retried:
//!   inputs are immutable and every operation is deterministic, so a retry
//!   with the same input reproduces the same failure.
//! - Collaborator failures (canonicalization, structural transforms) are
//!   carried verbatim as their source error.
//! - Statement syntax errors include the offending line and the reason.

use thiserror::Error;

/// Boxed error produced by an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for the selective-disclosure stack.
#[derive(Error, Debug)]
pub enum SdpError {
    /// A parameter had the wrong shape or type (document not an object,
    /// options not an object, missing `@context`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A JSON pointer contained an escape sequence other than `~0` or `~1`.
    #[error("invalid JSON pointer escape sequence \"{sequence}\" in \"{pointer}\"")]
    MalformedPointer {
        /// The pointer as supplied.
        pointer: String,
        /// The offending escape sequence.
        sequence: String,
    },

    /// A JSON pointer did not resolve against the document.
    #[error("JSON pointer \"{pointer}\" does not match document")]
    PointerNotFound {
        /// The pointer as supplied.
        pointer: String,
    },

    /// The document shape cannot be expressed by the requested operation.
    #[error("unsupported structure: {0}")]
    UnsupportedStructure(String),

    /// The graph canonicalizer rejected its input.
    #[error("canonicalization failed: {0}")]
    CanonicalizationFailed(#[source] BoxError),

    /// The structured-document transformer rejected its input.
    #[error("transform failed: {0}")]
    TransformFailed(#[source] BoxError),

    /// A blank node label had no entry in the label map used to rewrite it.
    #[error("no replacement label for blank node \"{0}\"")]
    UnmappedLabel(String),

    /// A statement could not be parsed.
    #[error("statement error: {0}")]
    Statement(#[from] StatementError),

    /// Cryptographic primitive failure.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl SdpError {
    /// Wrap a collaborator error raised during canonicalization.
    pub fn canonicalization(err: impl Into<BoxError>) -> Self {
        Self::CanonicalizationFailed(err.into())
    }

    /// Wrap a collaborator error raised during a structural transform.
    pub fn transform(err: impl Into<BoxError>) -> Self {
        Self::TransformFailed(err.into())
    }
}

/// Error while parsing an N-Quads statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// The line ended before a complete statement was read.
    #[error("unexpected end of statement: {line:?}")]
    UnexpectedEnd {
        /// The offending line.
        line: String,
    },

    /// A term could not be read at the given byte offset.
    #[error("invalid term at offset {offset}: {reason} in {line:?}")]
    InvalidTerm {
        /// The offending line.
        line: String,
        /// Byte offset of the term.
        offset: usize,
        /// What was wrong.
        reason: String,
    },

    /// The statement was not terminated by ` .`.
    #[error("missing statement terminator in {line:?}")]
    MissingTerminator {
        /// The offending line.
        line: String,
    },
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key parsing or construction failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Decoding an encoded digest failed.
    #[error("decode error: {0}")]
    DecodeError(String),
}
