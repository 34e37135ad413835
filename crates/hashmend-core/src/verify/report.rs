//! Per-entry outcomes and the run summary.

use crate::fetch::FetchError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Verified,
    /// `actual` is `None` when the file exists but could not be read.
    Mismatched {
        expected: String,
        actual: Option<String>,
    },
    Missing {
        expected: String,
    },
}

/// Why a repair attempt did not replace the file.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("no remote path for this file")]
    NoRemotePath,
    #[error("path leads outside the target root; not repaired")]
    OutsideRoot,
    #[error("create directory {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("download failed: {0}")]
    Download(#[source] FetchError),
}

#[derive(Debug)]
pub enum RepairResult {
    Repaired { url: String, bytes: u64 },
    Failed { url: Option<String>, error: RepairError },
    /// Dry run: the URL that would have been fetched.
    Skipped { url: String },
}

/// Everything known about one processed entry.
#[derive(Debug)]
pub struct EntryReport {
    /// Path as recorded in the manifest.
    pub path: String,
    pub resolved: PathBuf,
    pub outcome: Outcome,
    /// `None` for verified entries.
    pub repair: Option<RepairResult>,
}

impl fmt::Display for EntryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.resolved.display();
        match &self.outcome {
            Outcome::Verified => write!(f, "File integrity verified: {shown}")?,
            Outcome::Mismatched { expected, actual } => {
                writeln!(f, "File integrity verification failed: {shown}")?;
                writeln!(f, "  Expected hash: {expected}")?;
                match actual {
                    Some(actual) => write!(f, "  Calculated hash: {actual}")?,
                    None => write!(f, "  Calculated hash: <unreadable>")?,
                }
            }
            Outcome::Missing { .. } => write!(f, "File not found: {shown}")?,
        }
        match &self.repair {
            None => Ok(()),
            Some(RepairResult::Repaired { url, bytes }) => {
                write!(f, "\n  Downloaded {url} ({bytes} bytes)")
            }
            Some(RepairResult::Failed { url: Some(url), error }) => {
                write!(f, "\n  Repair from {url} failed: {error}")
            }
            Some(RepairResult::Failed { url: None, error }) => {
                write!(f, "\n  Repair failed: {error}")
            }
            Some(RepairResult::Skipped { url }) => write!(f, "\n  Would download {url}"),
        }
    }
}

/// Per-category tallies for one run.
///
/// `total` always equals the sum of the other fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifySummary {
    pub total: usize,
    pub verified: usize,
    pub mismatched_repaired: usize,
    pub missing_repaired: usize,
    pub repair_failed: usize,
    pub repair_skipped: usize,
}

impl VerifySummary {
    pub fn record(&mut self, report: &EntryReport) {
        self.total += 1;
        match (&report.outcome, &report.repair) {
            (Outcome::Verified, _) => self.verified += 1,
            (_, Some(RepairResult::Failed { .. })) | (_, None) => self.repair_failed += 1,
            (_, Some(RepairResult::Skipped { .. })) => self.repair_skipped += 1,
            (Outcome::Mismatched { .. }, Some(RepairResult::Repaired { .. })) => {
                self.mismatched_repaired += 1
            }
            (Outcome::Missing { .. }, Some(RepairResult::Repaired { .. })) => {
                self.missing_repaired += 1
            }
        }
    }

    /// True when every entry was verified or repaired.
    pub fn is_clean(&self) -> bool {
        self.repair_failed == 0 && self.repair_skipped == 0
    }
}

impl fmt::Display for VerifySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verification Summary:")?;
        writeln!(f, "  Total entries processed: {}", self.total)?;
        writeln!(f, "  Verified:                {}", self.verified)?;
        writeln!(f, "  Mismatched, repaired:    {}", self.mismatched_repaired)?;
        writeln!(f, "  Missing, repaired:       {}", self.missing_repaired)?;
        write!(f, "  Repair failed:           {}", self.repair_failed)?;
        if self.repair_skipped > 0 {
            write!(f, "\n  Repair skipped (dry run): {}", self.repair_skipped)?;
        }
        Ok(())
    }
}
