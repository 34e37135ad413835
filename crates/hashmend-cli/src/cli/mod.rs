//! CLI for hashmend.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hashmend_core::checksum::HASH_CHUNK_SIZE;
use hashmend_core::config::{self, HashmendConfig};
use std::path::PathBuf;

use commands::{run_checksum, run_hash, run_verify, VerifyArgs};

/// Top-level CLI for hashmend.
#[derive(Debug, Parser)]
#[command(name = "hashmend")]
#[command(about = "hashmend: verify a directory tree against a hash manifest and repair it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Hash every file under the target root and write the manifest.
    Hash {
        /// Directory to hash (default: config target_root, else $XDG_DATA_HOME/Plutonium).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Manifest file to write (default: config manifest_path).
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Verify the target root against the manifest and re-download divergent files.
    Verify {
        /// Directory to verify (default: config target_root, else $XDG_DATA_HOME/Plutonium).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Manifest file to read (default: config manifest_path).
        #[arg(long, short, value_name = "FILE")]
        manifest: Option<PathBuf>,
        /// Base URL of the remote copy (default: config base_url).
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Report what would be repaired without touching the tree.
        #[arg(long)]
        dry_run: bool,
        /// Print the summary as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Compute SHA-256 of a single file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Hash { root, output } => {
                let required = root.is_none() || output.is_none();
                let cfg = effective_config(required, config::load_or_init)?;
                let root = match root {
                    Some(r) => r,
                    None => cfg.resolve_target_root()?,
                };
                let output = output.unwrap_or_else(|| cfg.manifest_path.clone());
                run_hash(&root, &output, cfg.chunk_size)?;
            }
            CliCommand::Verify {
                root,
                manifest,
                base_url,
                dry_run,
                json,
            } => {
                let required = root.is_none() || manifest.is_none() || base_url.is_none();
                let cfg = effective_config(required, config::load_or_init)?;
                let root = match root {
                    Some(r) => r,
                    None => cfg.resolve_target_root()?,
                };
                let base_url = base_url.unwrap_or_else(|| cfg.base_url.clone());
                config::validate_base_url(&base_url)?;
                let args = VerifyArgs {
                    root,
                    manifest: manifest.unwrap_or_else(|| cfg.manifest_path.clone()),
                    base_url,
                    dry_run,
                    json,
                };
                run_verify(&args, &cfg)?;
            }
            CliCommand::Checksum { path } => run_checksum(&path, HASH_CHUNK_SIZE)?,
        }

        Ok(())
    }
}

/// Loads and validates the config file. When every value the command needs
/// came from flags (`required == false`), a missing or broken config only
/// logs a warning and built-in defaults are used.
pub(crate) fn effective_config<L>(required: bool, load: L) -> Result<HashmendConfig>
where
    L: FnOnce() -> Result<HashmendConfig>,
{
    let loaded = load().and_then(|cfg| {
        cfg.validate()?;
        Ok(cfg)
    });
    match loaded {
        Ok(cfg) => {
            tracing::debug!("loaded config: {:?}", cfg);
            Ok(cfg)
        }
        Err(err) if !required => {
            tracing::warn!("config unavailable, using defaults: {:#}", err);
            Ok(HashmendConfig::default())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests;
