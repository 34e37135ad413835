//! Streaming SHA-256 over file contents.
//!
//! Both the hasher and the verifier go through this module so a manifest
//! produced by one is always comparable with digests computed by the other.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reference chunk size for streaming reads.
pub const HASH_CHUNK_SIZE: usize = 4096;

/// Stream `reader` through SHA-256 in `chunk_size` pieces and return the
/// digest as lowercase hex. Memory use is bounded by `chunk_size`.
pub fn sha256_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<String> {
    if chunk_size == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "hash chunk size must be positive",
        ));
    }
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path, chunk_size: usize) -> io::Result<String> {
    let f = File::open(path)?;
    sha256_reader(f, chunk_size)
}
