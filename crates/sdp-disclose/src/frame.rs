//! # Pointer Frames
//!
//! Converts JSON pointers into JSON-LD frames for the grouping pipeline.
//! The result distinguishes "nothing selected" from "everything selected",
//! which a plain frame list cannot.

use sdp_core::{Pointer, SdpError};
use serde_json::Value;

use crate::select::{require_object, select_paths, SelectOptions, Selection};

/// Frames derived from a pointer list.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSelection {
    /// Select no statements.
    Nothing,
    /// Select every statement.
    Everything,
    /// Select the union of what each frame matches.
    Frames(Vec<Value>),
}

impl FrameSelection {
    /// `None` → nothing, `Some([])` → everything, otherwise the frames.
    pub fn from_frames(frames: Option<Vec<Value>>) -> Self {
        match frames {
            None => Self::Nothing,
            Some(frames) if frames.is_empty() => Self::Everything,
            Some(frames) => Self::Frames(frames),
        }
    }
}

/// Convert `pointers` into JSON-LD frames over `document`.
///
/// An empty pointer list yields [`FrameSelection::Nothing`]; a zero-step
/// pointer yields [`FrameSelection::Everything`]. Otherwise one frame is
/// produced per distinct element selected from any one array.
///
/// # Errors
///
/// As [`crate::select::select`], plus [`SdpError::UnsupportedStructure`] for
/// arrays of arrays.
pub fn pointers_to_frames(
    document: &Value,
    pointers: &[String],
    options: SelectOptions,
) -> Result<FrameSelection, SdpError> {
    require_object(document)?;
    if pointers.is_empty() {
        return Ok(FrameSelection::Nothing);
    }

    let mut frames = Vec::new();
    let mut frame = Selection::root(document, options.include_types);
    for pointer in pointers {
        let pointer = Pointer::parse(pointer)?;
        if pointer.is_whole_document() {
            return Ok(FrameSelection::Everything);
        }
        select_paths(
            &mut frame,
            document,
            &pointer,
            options.include_types,
            Some(&mut frames),
        )?;
    }
    frames.push(frame.to_value());

    tracing::debug!(frames = frames.len(), "converted pointers to frames");
    Ok(FrameSelection::Frames(frames))
}
