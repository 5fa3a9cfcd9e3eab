//! # JSON Pointer Selection
//!
//! Builds a minimal JSON-LD document containing only the values addressed by
//! a list of JSON pointers, plus what is needed to keep it meaningful:
//!
//! - the root `@context`;
//! - the `id` of every object on a selected path, unless it is a blank node
//!   label (`_:`);
//! - the `type` of every such object, when `include_types` is set.
//!
//! Arrays on a selected path are rebuilt sparsely and compacted at the end,
//! preserving the relative order of the selected elements.
//!
//! The same walk drives [`crate::frame::pointers_to_frames`]: in framing
//! mode, selecting a second element of an array snapshots the current frame
//! and starts a new one, because a JSON-LD frame cannot match more than one
//! array element.

use std::collections::BTreeMap;

use sdp_core::{Pointer, PointerStep, SdpError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::CONTEXT;

/// Selection options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptions {
    /// Copy `type` onto every object on a selected path.
    pub include_types: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            include_types: true,
        }
    }
}

/// Select the parts of `document` addressed by `pointers`.
///
/// Returns `None` for an empty pointer list and a copy of the whole document
/// as soon as a pointer with zero steps (`""`) is reached.
///
/// # Errors
///
/// - [`SdpError::InvalidArgument`] when `document` is not an object.
/// - [`SdpError::MalformedPointer`] for a bad escape sequence.
/// - [`SdpError::PointerNotFound`] when a pointer does not resolve.
pub fn select(
    document: &Value,
    pointers: &[String],
    options: SelectOptions,
) -> Result<Option<Value>, SdpError> {
    require_object(document)?;
    if pointers.is_empty() {
        return Ok(None);
    }

    let mut root = Selection::root(document, options.include_types);
    for pointer in pointers {
        let pointer = Pointer::parse(pointer)?;
        if pointer.is_whole_document() {
            return Ok(Some(document.clone()));
        }
        select_paths(&mut root, document, &pointer, options.include_types, None)?;
    }
    Ok(Some(root.to_value()))
}

pub(crate) fn require_object(document: &Value) -> Result<(), SdpError> {
    if document.is_object() {
        Ok(())
    } else {
        Err(SdpError::InvalidArgument(
            "\"document\" must be an object".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Selection tree
// ---------------------------------------------------------------------------

/// A partially built selection.
///
/// `Array` is sparse until rendered; `Copied` holds a value taken whole from
/// the source and is opened up lazily when a later pointer descends into it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Selection {
    Object(BTreeMap<String, Selection>),
    Array(BTreeMap<usize, Selection>),
    Copied(Value),
}

impl Selection {
    /// The root selection: `@context` plus the root's `id` / `type`.
    pub(crate) fn root(document: &Value, include_types: bool) -> Self {
        let mut root = Self::init(document, include_types);
        if let Self::Object(map) = &mut root {
            if let Some(context) = document.get(CONTEXT) {
                map.insert(CONTEXT.to_string(), Self::Copied(context.clone()));
            }
        }
        root
    }

    /// A fresh object selection carrying `source`'s identity.
    fn init(source: &Value, include_types: bool) -> Self {
        let mut map = BTreeMap::new();
        if let Some(Value::String(id)) = source.get("id") {
            if !id.starts_with(sdp_core::BLANK_NODE_PREFIX) {
                map.insert("id".to_string(), Self::Copied(Value::String(id.clone())));
            }
        }
        if include_types {
            if let Some(types) = source.get("type").filter(|t| !t.is_null()) {
                map.insert("type".to_string(), Self::Copied(types.clone()));
            }
        }
        Self::Object(map)
    }

    /// A fresh selection for an intermediate `source` value.
    fn for_source(source: &Value, include_types: bool) -> Self {
        if source.is_array() {
            Self::Array(BTreeMap::new())
        } else {
            Self::init(source, include_types)
        }
    }

    /// Turn a copied object or array into an editable node.
    fn open(&mut self) {
        let opened = match self {
            Self::Copied(Value::Object(map)) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::Copied(v.clone())))
                    .collect(),
            ),
            Self::Copied(Value::Array(items)) => Self::Array(
                items
                    .iter()
                    .cloned()
                    .map(Self::Copied)
                    .enumerate()
                    .collect(),
            ),
            _ => return,
        };
        *self = opened;
    }

    fn child_mut(&mut self, step: &PointerStep) -> Option<&mut Selection> {
        self.open();
        match (self, step) {
            (Self::Object(map), step) => map.get_mut(step.as_key().as_ref()),
            (Self::Array(items), PointerStep::Index(i)) => items.get_mut(i),
            _ => None,
        }
    }

    fn has_child(&mut self, step: &PointerStep) -> bool {
        self.child_mut(step).is_some()
    }

    fn take_child(&mut self, step: &PointerStep) -> Option<Selection> {
        self.open();
        match (self, step) {
            (Self::Object(map), step) => map.remove(step.as_key().as_ref()),
            (Self::Array(items), PointerStep::Index(i)) => items.remove(i),
            _ => None,
        }
    }

    fn set_child(&mut self, step: &PointerStep, child: Selection) {
        self.open();
        match (self, step) {
            (Self::Object(map), step) => {
                map.insert(step.as_key().into_owned(), child);
            }
            (Self::Array(items), PointerStep::Index(i)) => {
                items.insert(*i, child);
            }
            // Unreachable: the source lookup already rejected the step.
            _ => {}
        }
    }

    fn is_non_empty_array(&self) -> bool {
        match self {
            Self::Array(items) => !items.is_empty(),
            Self::Copied(Value::Array(items)) => !items.is_empty(),
            _ => false,
        }
    }

    fn clear(&mut self) {
        *self = Self::Array(BTreeMap::new());
    }

    /// Descend along `path`.
    fn descend_mut(&mut self, path: &[PointerStep]) -> Option<&mut Selection> {
        let mut current = self;
        for step in path {
            current = current.child_mut(step)?;
        }
        Some(current)
    }

    /// Render as JSON, compacting sparse arrays in index order.
    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Array(items) => Value::Array(items.values().map(Self::to_value).collect()),
            Self::Copied(value) => value.clone(),
        }
    }
}

fn lookup<'a>(source: &'a Value, step: &PointerStep) -> Option<&'a Value> {
    match (source, step) {
        (Value::Object(map), step) => map.get(step.as_key().as_ref()),
        (Value::Array(items), PointerStep::Index(i)) => items.get(*i),
        _ => None,
    }
}

fn not_found(pointer: &Pointer) -> SdpError {
    SdpError::PointerNotFound {
        pointer: pointer.as_str().to_string(),
    }
}

/// Add the value addressed by `pointer` to `root`.
///
/// With `frames` set, `root` is a frame: arrays may not nest, and a
/// selection that would put a second element into an array first pushes a
/// snapshot of `root` onto `frames` and empties that array.
pub(crate) fn select_paths(
    root: &mut Selection,
    document: &Value,
    pointer: &Pointer,
    include_types: bool,
    mut frames: Option<&mut Vec<Value>>,
) -> Result<(), SdpError> {
    let steps = pointer.steps();
    let Some((last, _)) = steps.split_last() else {
        return Ok(());
    };

    let mut source = document;
    for (depth, step) in steps.iter().enumerate() {
        let parent_source = source;
        source = lookup(parent_source, step).ok_or_else(|| not_found(pointer))?;

        if frames.is_some() && parent_source.is_array() && source.is_array() {
            return Err(nested_arrays());
        }

        let parent_path = &steps[..depth];
        let (exists, non_empty_array) = {
            let parent = root
                .descend_mut(parent_path)
                .ok_or_else(|| not_found(pointer))?;
            (parent.has_child(step), parent.is_non_empty_array())
        };
        if exists {
            continue;
        }

        if let Some(frames) = frames.as_deref_mut() {
            if non_empty_array {
                frames.push(root.to_value());
                if let Some(parent) = root.descend_mut(parent_path) {
                    parent.clear();
                }
            }
        }

        let fresh = Selection::for_source(source, include_types);
        root.descend_mut(parent_path)
            .ok_or_else(|| not_found(pointer))?
            .set_child(step, fresh);
    }

    let parent_path = &steps[..steps.len() - 1];
    let parent = root
        .descend_mut(parent_path)
        .ok_or_else(|| not_found(pointer))?;

    let selected = match source {
        Value::Array(items) => {
            if frames.is_some() && items.iter().any(Value::is_array) {
                return Err(nested_arrays());
            }
            Selection::Copied(source.clone())
        }
        Value::Object(map) => {
            let mut existing = parent
                .take_child(last)
                .unwrap_or_else(|| Selection::Object(BTreeMap::new()));
            existing.open();
            match existing {
                Selection::Object(mut merged) => {
                    for (key, value) in map {
                        merged.insert(key.clone(), Selection::Copied(value.clone()));
                    }
                    Selection::Object(merged)
                }
                _ => Selection::Copied(source.clone()),
            }
        }
        literal => Selection::Copied(literal.clone()),
    };
    parent.set_child(last, selected);
    Ok(())
}

fn nested_arrays() -> SdpError {
    SdpError::UnsupportedStructure("arrays of arrays are not supported".to_string())
}
