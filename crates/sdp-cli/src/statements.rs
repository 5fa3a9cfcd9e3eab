//! # Statement Subcommands
//!
//! `skolemize`, `deskolemize` and `relabel` over N-Quads read from a file
//! or stdin. Output is one statement per line, in input order.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sdp_core::{
    deskolemize_statements, relabel_blank_nodes, skolemize_statements, split_statements,
    LabelMap, DEFAULT_SKOLEM_PREFIX,
};

use crate::input::{read_input, read_json};

/// Arguments for the skolemize and deskolemize subcommands.
#[derive(Args, Debug)]
pub struct SkolemArgs {
    /// N-Quads input (`-` for stdin).
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// Skolem IRI prefix.
    #[arg(long, default_value = DEFAULT_SKOLEM_PREFIX)]
    pub prefix: String,
}

/// Arguments for the relabel subcommand.
#[derive(Args, Debug)]
pub struct RelabelArgs {
    /// N-Quads input (`-` for stdin).
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// JSON object mapping current labels to new labels, without `_:`.
    #[arg(long)]
    pub label_map: PathBuf,
}

/// Replace blank nodes with skolem IRIs.
pub fn run_skolemize(args: &SkolemArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let nquads = read_input(args.input.as_deref())?;
    let statements = skolemize_statements(&split_statements(&nquads), &args.prefix)?;
    write_statements(&statements, out)
}

/// Replace skolem IRIs with blank nodes.
pub fn run_deskolemize(args: &SkolemArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let nquads = read_input(args.input.as_deref())?;
    let statements = deskolemize_statements(&split_statements(&nquads), &args.prefix)?;
    write_statements(&statements, out)
}

/// Rewrite blank node labels through a label map.
pub fn run_relabel(args: &RelabelArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let label_map: LabelMap = serde_json::from_value(read_json(Some(&args.label_map))?)
        .context("label map must be a JSON object of strings")?;
    let nquads = read_input(args.input.as_deref())?;
    let statements = relabel_blank_nodes(&split_statements(&nquads), &label_map)?;
    tracing::debug!(statements = statements.len(), "relabelled statements");
    write_statements(&statements, out)
}

fn write_statements(statements: &[String], out: &mut impl Write) -> anyhow::Result<()> {
    for statement in statements {
        out.write_all(statement.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
