//! `hashmend verify` – check the tree against the manifest and repair it.

use anyhow::Result;
use hashmend_core::config::HashmendConfig;
use hashmend_core::fetch::CurlFetcher;
use hashmend_core::verify::{self, VerifyOptions};
use std::path::PathBuf;

/// Resolved inputs for one verification run.
#[derive(Debug)]
pub struct VerifyArgs {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub base_url: String,
    pub dry_run: bool,
    pub json: bool,
}

/// Completes with Ok regardless of per-file repair outcomes; only an
/// unreadable manifest is an error.
pub fn run_verify(args: &VerifyArgs, cfg: &HashmendConfig) -> Result<()> {
    let opts = VerifyOptions {
        base_url: args.base_url.clone(),
        chunk_size: cfg.chunk_size,
        dry_run: args.dry_run,
    };
    let fetcher = CurlFetcher::new(cfg.fetch_options());

    let summary = verify::verify_tree(&args.root, &args.manifest, &opts, &fetcher, |report| {
        if !args.json {
            println!("{report}");
        }
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!("{summary}");
    }
    Ok(())
}
