//! `hashmend hash` – build the manifest for a tree.

use anyhow::Result;
use hashmend_core::hasher;
use std::path::Path;

pub fn run_hash(root: &Path, output: &Path, chunk_size: usize) -> Result<()> {
    let report = hasher::generate_manifest(root, output, chunk_size)?;
    for failure in &report.failures {
        println!("Could not hash {}: {}", failure.path.display(), failure.error);
    }
    println!(
        "Hashes generated and saved successfully: {} files -> {}",
        report.files_hashed,
        output.display()
    );
    if !report.failures.is_empty() {
        println!("{} files could not be hashed.", report.failures.len());
    }
    Ok(())
}
