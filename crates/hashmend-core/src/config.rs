use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::checksum::HASH_CHUNK_SIZE;
use crate::fetch::FetchOptions;

/// Remote tree that mirrors a pristine copy of the target root.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/AcruxVrs/Plutonium-Verifier/main/PlutoniumCopy%20-%20Copy/";

/// Directory under the user data home that is verified when no root is configured.
pub const DEFAULT_TARGET_DIR: &str = "Plutonium";

/// HTTP timeouts (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 300,
        }
    }
}

impl HttpConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/hashmend/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashmendConfig {
    /// Tree to hash and verify. Defaults to `$XDG_DATA_HOME/Plutonium`.
    #[serde(default)]
    pub target_root: Option<PathBuf>,
    /// Manifest location; relative paths resolve against the working directory.
    pub manifest_path: PathBuf,
    /// Base URL of the remote copy used for repairs.
    pub base_url: String,
    /// Streaming read size for hashing.
    pub chunk_size: usize,
    /// Optional HTTP timeouts; if missing, built-in defaults are used.
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for HashmendConfig {
    fn default() -> Self {
        Self {
            target_root: None,
            manifest_path: PathBuf::from("hashes.txt"),
            base_url: DEFAULT_BASE_URL.to_string(),
            chunk_size: HASH_CHUNK_SIZE,
            http: None,
        }
    }
}

impl HashmendConfig {
    /// Reject values no run could work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("chunk_size must be positive");
        }
        validate_base_url(&self.base_url)
    }

    /// Configured target root, or the per-user data directory default.
    pub fn resolve_target_root(&self) -> Result<PathBuf> {
        match &self.target_root {
            Some(root) => Ok(root.clone()),
            None => default_target_root(),
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        self.http.clone().unwrap_or_default().fetch_options()
    }
}

/// Accept only absolute http(s) URLs.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(base_url).with_context(|| format!("invalid base_url {base_url:?}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("base_url must be http or https, got {other:?}"),
    }
}

/// `$XDG_DATA_HOME/Plutonium`, the Linux home of per-user application data.
pub fn default_target_root() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::new()?;
    Ok(xdg_dirs.get_data_home().join(DEFAULT_TARGET_DIR))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hashmend")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HashmendConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HashmendConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HashmendConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = HashmendConfig::default();
        assert_eq!(cfg.manifest_path, PathBuf::from("hashes.txt"));
        assert_eq!(cfg.chunk_size, 4096);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.target_root.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = HashmendConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HashmendConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.manifest_path, cfg.manifest_path);
        assert_eq!(parsed.base_url, cfg.base_url);
        assert_eq!(parsed.chunk_size, cfg.chunk_size);
        assert!(parsed.target_root.is_none());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            target_root = "/srv/game"
            manifest_path = "/var/lib/hashmend/hashes.txt"
            base_url = "http://mirror.local/game"
            chunk_size = 65536

            [http]
            connect_timeout_secs = 5
            timeout_secs = 60
        "#;
        let cfg: HashmendConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.resolve_target_root().unwrap(), PathBuf::from("/srv/game"));
        assert_eq!(cfg.chunk_size, 65536);
        let opts = cfg.fetch_options();
        assert_eq!(opts.connect_timeout, Duration::from_secs(5));
        assert_eq!(opts.timeout, Duration::from_secs(60));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_http_section_uses_defaults() {
        let toml = r#"
            manifest_path = "hashes.txt"
            base_url = "https://example.com/tree/"
            chunk_size = 4096
        "#;
        let cfg: HashmendConfig = toml::from_str(toml).unwrap();
        assert!(cfg.http.is_none());
        assert_eq!(cfg.fetch_options().timeout, Duration::from_secs(300));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let cfg = HashmendConfig {
            chunk_size: 0,
            ..HashmendConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(validate_base_url("https://example.com/x/").is_ok());
        assert!(validate_base_url("ftp://example.com/x/").is_err());
        assert!(validate_base_url("not a url").is_err());
    }
}
