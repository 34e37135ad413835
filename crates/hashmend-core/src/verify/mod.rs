//! Verification and repair of a target tree against a manifest.
//!
//! Entries are processed one at a time in manifest order: resolve against the
//! root, hash, classify, and for anything not verified fetch a replacement
//! from the remote tree. Only an unreadable manifest aborts the run.

mod report;

pub use report::{EntryReport, Outcome, RepairError, RepairResult, VerifySummary};

use crate::checksum;
use crate::fetch::Fetcher;
use crate::manifest::{read_manifest, ManifestEntry, ManifestError};
use crate::remote::{escapes_root, remote_url};
use std::fs;
use std::path::Path;

/// Knobs for one verification run.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Base of the remote tree that mirrors the target root.
    pub base_url: String,
    /// Streaming chunk size for re-hashing; must be positive.
    pub chunk_size: usize,
    /// Classify and report, but do not create directories or download.
    pub dry_run: bool,
}

/// Verifies every manifest entry under `root`, repairing divergent files via `fetcher`.
///
/// `on_entry` is called once per entry, in manifest order, as soon as that
/// entry is finished.
pub fn verify_tree<F, C>(
    root: &Path,
    manifest_path: &Path,
    opts: &VerifyOptions,
    fetcher: &F,
    mut on_entry: C,
) -> Result<VerifySummary, ManifestError>
where
    F: Fetcher + ?Sized,
    C: FnMut(&EntryReport),
{
    let manifest = read_manifest(manifest_path)?;
    tracing::info!(
        "verifying {} entries under {} (dry_run={})",
        manifest.len(),
        root.display(),
        opts.dry_run
    );

    let mut summary = VerifySummary::default();
    for entry in &manifest {
        let report = verify_entry(root, entry, opts, fetcher);
        summary.record(&report);
        on_entry(&report);
    }

    tracing::info!(
        "verification finished: total={} verified={} mismatched_repaired={} missing_repaired={} repair_failed={} repair_skipped={}",
        summary.total,
        summary.verified,
        summary.mismatched_repaired,
        summary.missing_repaired,
        summary.repair_failed,
        summary.repair_skipped
    );
    Ok(summary)
}

/// Classifies and, if needed, repairs a single manifest entry.
pub fn verify_entry<F>(
    root: &Path,
    entry: &ManifestEntry,
    opts: &VerifyOptions,
    fetcher: &F,
) -> EntryReport
where
    F: Fetcher + ?Sized,
{
    // An absolute entry path replaces the root entirely (Path::join semantics).
    let resolved = root.join(&entry.path);
    let outcome = classify(&resolved, &entry.hash, opts.chunk_size);

    let repair = match outcome {
        Outcome::Verified => {
            tracing::debug!("verified {}", resolved.display());
            None
        }
        _ => Some(attempt_repair(root, &resolved, opts, fetcher)),
    };

    EntryReport {
        path: entry.path.clone(),
        resolved,
        outcome,
        repair,
    }
}

fn classify(resolved: &Path, expected: &str, chunk_size: usize) -> Outcome {
    if !resolved.is_file() {
        tracing::warn!("missing {}", resolved.display());
        return Outcome::Missing {
            expected: expected.to_string(),
        };
    }
    match checksum::sha256_path(resolved, chunk_size) {
        Ok(actual) if actual == expected => Outcome::Verified,
        Ok(actual) => {
            tracing::warn!(
                "hash mismatch {}: expected {} got {}",
                resolved.display(),
                expected,
                actual
            );
            Outcome::Mismatched {
                expected: expected.to_string(),
                actual: Some(actual),
            }
        }
        Err(e) => {
            tracing::warn!("cannot hash {}: {}", resolved.display(), e);
            Outcome::Mismatched {
                expected: expected.to_string(),
                actual: None,
            }
        }
    }
}

fn attempt_repair<F>(root: &Path, resolved: &Path, opts: &VerifyOptions, fetcher: &F) -> RepairResult
where
    F: Fetcher + ?Sized,
{
    if escapes_root(root, resolved) {
        tracing::warn!(
            "refusing to repair {}: outside {}",
            resolved.display(),
            root.display()
        );
        return RepairResult::Failed {
            url: None,
            error: RepairError::OutsideRoot,
        };
    }

    let Some(url) = remote_url(&opts.base_url, root, resolved) else {
        tracing::warn!("no remote path for {}", resolved.display());
        return RepairResult::Failed {
            url: None,
            error: RepairError::NoRemotePath,
        };
    };

    if opts.dry_run {
        return RepairResult::Skipped { url };
    }

    if let Some(dir) = resolved.parent() {
        if let Err(source) = fs::create_dir_all(dir) {
            tracing::warn!("cannot create {}: {}", dir.display(), source);
            return RepairResult::Failed {
                url: Some(url),
                error: RepairError::CreateDir {
                    dir: dir.to_path_buf(),
                    source,
                },
            };
        }
    }

    match fetcher.fetch(&url, resolved) {
        Ok(bytes) => {
            tracing::info!("repaired {} from {} ({} bytes)", resolved.display(), url, bytes);
            RepairResult::Repaired { url, bytes }
        }
        Err(e) => {
            tracing::warn!("download {} failed: {}", url, e);
            RepairResult::Failed {
                url: Some(url),
                error: RepairError::Download(e),
            }
        }
    }
}
