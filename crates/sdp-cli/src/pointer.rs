//! # Pointer Subcommands
//!
//! `pointer`, `select` and `frames`.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sdp_core::parse_pointer;
use sdp_disclose::{pointers_to_frames, select, FrameSelection, SelectOptions};
use serde_json::Value;

use crate::input::read_json;

/// Arguments for the pointer subcommand.
#[derive(Args, Debug)]
pub struct PointerArgs {
    /// RFC 6901 JSON pointer.
    pub pointer: String,
}

/// Arguments shared by the select and frames subcommands.
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// JSON document to select from (`-` for stdin).
    #[arg(long, short)]
    pub document: Option<PathBuf>,
    /// JSON pointer; repeat for several.
    #[arg(long = "pointer", short)]
    pub pointers: Vec<String>,
    /// Do not copy `type` onto selected objects.
    #[arg(long)]
    pub no_types: bool,
}

impl SelectArgs {
    fn options(&self) -> SelectOptions {
        SelectOptions {
            include_types: !self.no_types,
        }
    }
}

/// Print the steps of a pointer as a JSON array.
pub fn run_pointer(args: &PointerArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let steps = parse_pointer(&args.pointer)?;
    writeln!(out, "{}", serde_json::to_string(&steps)?)?;
    Ok(())
}

/// Print the selection, or `null` when no pointers were given.
pub fn run_select(args: &SelectArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let document = read_json(args.document.as_deref())?;
    run_select_document(args, &document, out)
}

fn run_select_document(args: &SelectArgs, document: &Value, out: &mut impl Write) -> anyhow::Result<()> {
    let selection = select(document, &args.pointers, args.options())?;
    tracing::debug!(pointers = args.pointers.len(), "selected document");
    writeln!(out, "{}", serde_json::to_string_pretty(&selection)?)?;
    Ok(())
}

/// Print frames: `null` selects nothing, `[]` selects everything.
pub fn run_frames(args: &SelectArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let document = read_json(args.document.as_deref())?;
    run_frames_document(args, &document, out)
}

fn run_frames_document(args: &SelectArgs, document: &Value, out: &mut impl Write) -> anyhow::Result<()> {
    let rendered = match pointers_to_frames(document, &args.pointers, args.options())? {
        FrameSelection::Nothing => Value::Null,
        FrameSelection::Everything => Value::Array(Vec::new()),
        FrameSelection::Frames(frames) => Value::Array(frames),
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&rendered)?)?;
    Ok(())
}
