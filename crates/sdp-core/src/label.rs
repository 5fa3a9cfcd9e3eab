//! # Blank Node Label Maps
//!
//! Three label namespaces exist and are never mixed:
//!
//! - **input labels**: as authored in the statements handed to the
//!   canonicalizer;
//! - **canonical labels**: assigned by the canonicalizer, stable only for one
//!   call;
//! - **replacement labels**: produced by a [`LabelMapFactory`], the only
//!   labels allowed to leave the pipeline.
//!
//! A [`CanonicalIdMap`] maps input → canonical. A [`LabelMap`] maps
//! input → replacement and always has exactly the canonical map's domain.
//! Both are ordered maps so iteration (and therefore every derived output) is
//! deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SdpError;
use crate::statement::BLANK_NODE_PREFIX;

macro_rules! label_map_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(BTreeMap<String, String>);

        impl $name {
            /// Create an empty map.
            pub fn new() -> Self {
                Self::default()
            }

            /// Look up the label mapped from `key`.
            pub fn get(&self, key: &str) -> Option<&str> {
                self.0.get(key).map(String::as_str)
            }

            /// Insert a mapping, returning the previous value.
            pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
                self.0.insert(key.into(), value.into())
            }

            /// True when `key` is mapped.
            pub fn contains_key(&self, key: &str) -> bool {
                self.0.contains_key(key)
            }

            /// Iterate mappings in key order.
            pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
                self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
            }

            /// Iterate keys in order.
            pub fn keys(&self) -> impl Iterator<Item = &str> {
                self.0.keys().map(String::as_str)
            }

            /// Number of mappings.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// True when there are no mappings.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl FromIterator<(String, String)> for $name {
            fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl IntoIterator for $name {
            type Item = (String, String);
            type IntoIter = std::collections::btree_map::IntoIter<String, String>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl From<BTreeMap<String, String>> for $name {
            fn from(map: BTreeMap<String, String>) -> Self {
                Self(map)
            }
        }
    };
}

label_map_type! {
    /// Input label → canonical label, as reported by the canonicalizer.
    CanonicalIdMap
}

label_map_type! {
    /// Input label → replacement label. The externally visible artifact.
    ///
    /// Also used for any other label-to-label table (for example an explicit
    /// canonical → replacement table, or a reversed canonical → input map).
    LabelMap
}

/// Remove `_:` prefixes from both sides of a canonical id map.
///
/// Whether the map uses prefixes is detected once, from its first entry; a
/// map whose first key is unprefixed is returned as-is.
pub fn strip_blank_node_prefixes(map: CanonicalIdMap) -> CanonicalIdMap {
    let prefixed = map
        .keys()
        .next()
        .is_some_and(|first| first.starts_with(BLANK_NODE_PREFIX));
    if !prefixed {
        return map;
    }
    map.into_iter()
        .map(|(k, v)| (strip_prefix(k), strip_prefix(v)))
        .collect()
}

fn strip_prefix(label: String) -> String {
    match label.strip_prefix(BLANK_NODE_PREFIX) {
        Some(stripped) => stripped.to_string(),
        None => label,
    }
}

/// Strategy producing replacement labels from a canonical id map.
///
/// The returned map is keyed by input label. Implementations decide how the
/// replacement is derived; the pipeline never invents labels itself.
pub trait LabelMapFactory: Send + Sync {
    /// Produce input label → replacement label for every entry of
    /// `canonical_id_map`.
    fn create_label_map(&self, canonical_id_map: &CanonicalIdMap) -> Result<LabelMap, SdpError>;
}

impl<F> LabelMapFactory for F
where
    F: Fn(&CanonicalIdMap) -> Result<LabelMap, SdpError> + Send + Sync,
{
    fn create_label_map(&self, canonical_id_map: &CanonicalIdMap) -> Result<LabelMap, SdpError> {
        self(canonical_id_map)
    }
}

/// Label map factory backed by a caller-supplied canonical → replacement table.
#[derive(Debug, Clone)]
pub struct ExplicitLabelMapFactory {
    table: LabelMap,
}

impl ExplicitLabelMapFactory {
    /// Wrap a canonical label → replacement label table.
    pub fn new(table: LabelMap) -> Self {
        Self { table }
    }
}

impl LabelMapFactory for ExplicitLabelMapFactory {
    fn create_label_map(&self, canonical_id_map: &CanonicalIdMap) -> Result<LabelMap, SdpError> {
        canonical_id_map
            .iter()
            .map(|(input, canonical)| {
                self.table
                    .get(canonical)
                    .map(|replacement| (input.to_string(), replacement.to_string()))
                    .ok_or_else(|| SdpError::UnmappedLabel(canonical.to_string()))
            })
            .collect()
    }
}

/// Create a label map factory from an explicit canonical → replacement table.
pub fn create_label_map_function(table: LabelMap) -> ExplicitLabelMapFactory {
    ExplicitLabelMapFactory::new(table)
}
