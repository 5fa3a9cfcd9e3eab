//! # Expanded JSON-LD Elements
//!
//! Classifies the elements of an expanded JSON-LD document so that walkers
//! can match exhaustively instead of probing keys ad hoc.

use serde_json::{Map, Value};

/// JSON-LD keyword carrying a node identifier.
pub const ID: &str = "@id";
/// JSON-LD keyword carrying a value object's value.
pub const VALUE: &str = "@value";
/// JSON-LD keyword for ordered list containers.
pub const LIST: &str = "@list";
/// JSON-LD keyword for set containers.
pub const SET: &str = "@set";
/// JSON-LD keyword carrying a document context.
pub const CONTEXT: &str = "@context";

/// One element of an expanded JSON-LD document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpandedElement<'a> {
    /// Scalar, `null` or `@value` object. Never rewritten.
    Literal(&'a Value),
    /// Node reference: an object whose only key is `@id`.
    Reference(&'a str),
    /// Node object, with or without an `@id`.
    Node(&'a Map<String, Value>),
    /// `@list` / `@set` container object. Recursed into, never identified.
    Container(&'a Map<String, Value>),
    /// Array of elements.
    Array(&'a [Value]),
}

impl<'a> ExpandedElement<'a> {
    /// Classify `value`.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(items),
            Value::Object(map) if map.contains_key(VALUE) => Self::Literal(value),
            Value::Object(map) if map.contains_key(LIST) || map.contains_key(SET) => {
                Self::Container(map)
            }
            Value::Object(map) => match (map.len(), map.get(ID)) {
                (1, Some(Value::String(id))) => Self::Reference(id),
                _ => Self::Node(map),
            },
            _ => Self::Literal(value),
        }
    }
}
