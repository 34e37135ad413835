//! Manifest generation: walk a tree, hash every regular file, write the manifest.

use crate::checksum;
use crate::manifest::{ManifestWriter, DELIMITER};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file (or directory entry) that could not be hashed.
#[derive(Debug)]
pub struct HashFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of one manifest generation run.
#[derive(Debug, Default)]
pub struct HashReport {
    pub files_hashed: usize,
    pub failures: Vec<HashFailure>,
}

/// Walks `root`, hashes every regular file and writes `path,hash` lines to
/// `output`, overwriting it. Paths are recorded relative to `root` with
/// forward slashes.
///
/// Files that cannot be read are reported in [`HashReport::failures`] and
/// skipped; only an invalid root or an unwritable output fails the run.
pub fn generate_manifest(root: &Path, output: &Path, chunk_size: usize) -> Result<HashReport> {
    if !root.is_dir() {
        bail!("target root {} is not a directory", root.display());
    }

    let mut writer = ManifestWriter::create(output)?;
    // Compare canonical paths so the manifest is never hashed into itself.
    let output_canon = fs::canonicalize(output)
        .with_context(|| format!("resolve manifest path {}", output.display()))?;

    let mut report = HashReport::default();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                tracing::warn!("skipping {}: {}", path.display(), e);
                report.failures.push(HashFailure {
                    path,
                    error: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if fs::canonicalize(path).map_or(false, |p| p == output_canon) {
            tracing::debug!("not hashing manifest output {}", path.display());
            continue;
        }
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let rel = match manifest_record_path(rel) {
            Ok(rel) => rel,
            Err(reason) => {
                tracing::warn!("cannot record {}: {}", path.display(), reason);
                report.failures.push(HashFailure {
                    path: path.to_path_buf(),
                    error: reason.to_string(),
                });
                continue;
            }
        };

        match checksum::sha256_path(path, chunk_size) {
            Ok(hash) => {
                writer.append(&rel, &hash)?;
                report.files_hashed += 1;
            }
            Err(e) => {
                tracing::warn!("cannot hash {}: {}", path.display(), e);
                report.failures.push(HashFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }

    writer.finish()?;
    tracing::info!(
        "hashed {} files under {} into {} ({} failures)",
        report.files_hashed,
        root.display(),
        output.display(),
        report.failures.len()
    );
    Ok(report)
}

/// Root-relative path as it is written to the manifest: UTF-8 components
/// joined with `/`. Names that could not be read back unchanged are rejected.
fn manifest_record_path(rel: &Path) -> std::result::Result<String, &'static str> {
    let mut parts = Vec::new();
    for component in rel.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or("path is not valid UTF-8")?;
        parts.push(part);
    }
    let joined = parts.join("/");
    if joined.chars().any(|c| c == '\n' || c == '\r' || c == DELIMITER) {
        return Err("path contains a line break or the manifest delimiter");
    }
    Ok(joined)
}
