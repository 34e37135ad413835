//! Remote fetcher: one HTTP GET, body persisted to a local path.
//!
//! Uses the curl crate (libcurl) with a blocking `Easy` handle. There is no
//! retry; a failed fetch leaves the destination untouched.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Why a fetch did not produce a file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connect, TLS, timeout and other transport-level failures.
    #[error("transport error: {0}")]
    Transport(#[from] curl::Error),
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The body arrived but could not be written.
    #[error("write {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads a URL into a destination file.
pub trait Fetcher {
    /// Fetch `url` and overwrite `dest` with the body. Returns bytes written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// Timeouts applied to each GET.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            tracing::warn!("GET {} returned HTTP {}", url, code);
            return Err(FetchError::Http(code));
        }

        fs::write(dest, &body).map_err(|source| FetchError::Storage {
            path: dest.to_path_buf(),
            source,
        })?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, dest.display(), body.len());
        Ok(body.len() as u64)
    }
}
