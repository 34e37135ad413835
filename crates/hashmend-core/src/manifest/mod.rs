//! Manifest: the persisted path -> hash mapping.
//!
//! On disk a manifest is plain text, one `<path>,<hex-digest>` record per
//! line, no header and no escaping. Paths containing a comma cannot be
//! represented.

mod parse;
mod writer;

pub use parse::parse_manifest;
pub use writer::ManifestWriter;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Field separator between path and digest.
pub const DELIMITER: char = ',';

/// One manifest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    pub hash: String,
}

/// Failure to load a manifest. This is the only fatal error of a verification run.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered manifest entries keyed by path.
///
/// A repeated path keeps the position of its first occurrence and takes the
/// hash of its last one.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    index: HashMap<String, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: String, hash: String) {
        match self.index.get(&path) {
            Some(&i) => self.entries[i].hash = hash,
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push(ManifestEntry { path, hash });
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.index.get(path).map(|&i| self.entries[i].hash.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Read and parse the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = parse_manifest(&text);
    tracing::debug!(
        "read manifest {} ({} entries)",
        path.display(),
        manifest.len()
    );
    Ok(manifest)
}
