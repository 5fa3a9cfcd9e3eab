//! Input helpers: files or stdin, JSON or N-Quads.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

/// Read a file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Read and parse a JSON document.
pub fn read_json(path: Option<&Path>) -> anyhow::Result<Value> {
    let text = read_input(path)?;
    parse_json(&text, path)
}

pub(crate) fn parse_json(text: &str, path: Option<&Path>) -> anyhow::Result<Value> {
    serde_json::from_str(text).with_context(|| {
        let source = path.map_or_else(|| PathBuf::from("<stdin>"), Path::to_path_buf);
        format!("invalid JSON in {}", source.display())
    })
}
