//! Checksum command: compute SHA-256 of a file.

use anyhow::{Context, Result};
use hashmend_core::checksum;
use std::path::Path;

/// Compute and print SHA-256 of the given file.
pub fn run_checksum(path: &Path, chunk_size: usize) -> Result<()> {
    let digest = checksum::sha256_path(path, chunk_size)
        .with_context(|| format!("hash {}", path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
