//! glb-inspect - command handlers for the GLB inspection tool.
//!
//! Handlers write to any `io::Write` so they can be driven from tests.

pub mod commands;

use anyhow::{Context, Result};
use glb_io::GlbContainer;
use std::path::Path;

/// Read and parse a GLB file.
pub fn load(path: &Path) -> Result<GlbContainer> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded file");
    glb_io::read_container(&bytes).with_context(|| format!("{} is not a valid GLB file", path.display()))
}
