//! Buffered manifest output.

use super::DELIMITER;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `<path>,<hash>` records to a freshly truncated file.
pub struct ManifestWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
}

impl ManifestWriter {
    /// Create (or truncate) the manifest at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("create manifest {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn append(&mut self, path: &str, hash: &str) -> Result<()> {
        writeln!(self.out, "{path}{DELIMITER}{hash}")
            .with_context(|| format!("write manifest {}", self.path.display()))?;
        self.written += 1;
        Ok(())
    }

    /// Flush buffered records and return how many were written.
    pub fn finish(mut self) -> Result<usize> {
        self.out
            .flush()
            .with_context(|| format!("flush manifest {}", self.path.display()))?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::read_manifest;

    #[test]
    fn writes_one_line_per_record_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashes.txt");
        std::fs::write(&path, "stale,old\nstale2,old\nstale3,old\n").unwrap();

        let mut w = ManifestWriter::create(&path).unwrap();
        w.append("a.txt", "abc").unwrap();
        w.append("sub/b.txt", "def").unwrap();
        assert_eq!(w.finish().unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "a.txt,abc\nsub/b.txt,def\n");
        let m = read_manifest(&path).unwrap();
        assert_eq!(m.get("stale"), None);
    }
}
