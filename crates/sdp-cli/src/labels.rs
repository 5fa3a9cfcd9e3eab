//! # HMAC Label Subcommand
//!
//! Derives replacement labels for a canonical id map with an HMAC-SHA-256
//! key, printing the input label → replacement label map as JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sdp_core::{strip_blank_node_prefixes, CanonicalIdMap, LabelMapFactory};
use sdp_crypto::{HmacIdLabelMapFactory, HmacKey};

use crate::input::read_json;

/// Arguments for the hmac-labels subcommand.
#[derive(Args, Debug)]
pub struct HmacLabelsArgs {
    /// Hex-encoded HMAC key.
    #[arg(long, env = "SDP_HMAC_KEY", hide_env_values = true)]
    pub key: String,
    /// JSON object mapping input labels to canonical labels (`-` for stdin).
    #[arg(long)]
    pub canonical_id_map: Option<PathBuf>,
}

/// Print the HMAC-derived label map.
pub fn run_hmac_labels(args: &HmacLabelsArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let value = read_json(args.canonical_id_map.as_deref())?;
    let canonical_id_map: CanonicalIdMap =
        serde_json::from_value(value).context("canonical id map must be a JSON object of strings")?;
    write_hmac_labels(&args.key, canonical_id_map, out)
}

fn write_hmac_labels(
    key: &str,
    canonical_id_map: CanonicalIdMap,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let key = HmacKey::from_hex(key)?;
    let factory = HmacIdLabelMapFactory::new(key);
    let label_map = factory.create_label_map(&strip_blank_node_prefixes(canonical_id_map))?;
    tracing::debug!(labels = label_map.len(), "derived HMAC labels");
    writeln!(out, "{}", serde_json::to_string_pretty(&label_map)?)?;
    Ok(())
}
