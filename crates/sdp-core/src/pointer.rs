//! # JSON Pointer Parsing
//!
//! Parses RFC 6901 JSON pointers into ordered property/index steps.
//!
//! A pointer is split on `/`, the leading segment (empty for a well-formed
//! pointer) is discarded, `~1` and `~0` are unescaped to `/` and `~`, and any
//! segment consisting solely of ASCII digits becomes an array index.
//!
//! A pointer with zero steps (`""`) denotes the whole document. Callers must
//! special-case it; there is no zero-step walk.

use serde::{Deserialize, Serialize};

use crate::error::SdpError;

/// One step of a parsed pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointerStep {
    /// Array index (also matches an object key spelled with the same digits).
    Index(usize),
    /// Object property name, unescaped.
    Key(String),
}

impl PointerStep {
    /// The step as an object key. Indices are rendered in base 10.
    pub fn as_key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Key(k) => std::borrow::Cow::Borrowed(k.as_str()),
            Self::Index(i) => std::borrow::Cow::Owned(i.to_string()),
        }
    }
}

impl std::fmt::Display for PointerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(&k.replace('~', "~0").replace('/', "~1")),
        }
    }
}

/// A parsed JSON pointer, retaining its source text for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    source: String,
    steps: Vec<PointerStep>,
}

impl Pointer {
    /// Parse a pointer string.
    ///
    /// # Errors
    ///
    /// Returns [`SdpError::MalformedPointer`] when a `~` is not followed by
    /// `0` or `1`.
    pub fn parse(pointer: &str) -> Result<Self, SdpError> {
        Ok(Self {
            source: pointer.to_string(),
            steps: parse_pointer(pointer)?,
        })
    }

    /// The pointer text as supplied.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed steps, root first.
    pub fn steps(&self) -> &[PointerStep] {
        &self.steps
    }

    /// True when the pointer selects the entire document.
    pub fn is_whole_document(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Pointer {
    type Err = SdpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a JSON pointer string into its steps.
///
/// # Errors
///
/// Returns [`SdpError::MalformedPointer`] for an escape other than `~0`/`~1`.
pub fn parse_pointer(pointer: &str) -> Result<Vec<PointerStep>, SdpError> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| parse_segment(pointer, segment))
        .collect()
}

fn parse_segment(pointer: &str, segment: &str) -> Result<PointerStep, SdpError> {
    if !segment.contains('~') {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            // Overflowing digit runs stay property names.
            if let Ok(index) = segment.parse::<usize>() {
                return Ok(PointerStep::Index(index));
            }
        }
        return Ok(PointerStep::Key(segment.to_string()));
    }

    let mut unescaped = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => unescaped.push('~'),
            Some('1') => unescaped.push('/'),
            other => {
                let mut sequence = String::from("~");
                if let Some(o) = other {
                    sequence.push(o);
                }
                return Err(SdpError::MalformedPointer {
                    pointer: pointer.to_string(),
                    sequence,
                });
            }
        }
    }
    Ok(PointerStep::Key(unescaped))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Escaping a property name and parsing it back yields the same name.
        #[test]
        fn escaped_keys_round_trip(name in "[a-zA-Z~/_]{1,12}") {
            let step = PointerStep::Key(name.clone());
            let parsed = parse_pointer(&format!("/{step}")).unwrap();
            prop_assert_eq!(parsed, vec![PointerStep::Key(name)]);
        }

        /// Every digit-only segment becomes an index.
        #[test]
        fn digit_segments_are_indices(n in 0usize..100_000) {
            let parsed = parse_pointer(&format!("/x/{n}")).unwrap();
            prop_assert_eq!(parsed[1].clone(), PointerStep::Index(n));
        }

        /// Parsing never panics.
        #[test]
        fn parse_never_panics(s in "\\PC{0,32}") {
            let _ = parse_pointer(&s);
        }
    }
}
