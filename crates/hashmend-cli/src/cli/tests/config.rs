//! Tests for when the config file is consulted.

use crate::cli::effective_config;
use anyhow::anyhow;
use hashmend_core::config::HashmendConfig;

#[test]
fn broken_config_is_fatal_when_a_value_is_missing() {
    let res = effective_config(true, || Err(anyhow!("parse config.toml: bad")));
    assert!(res.is_err());
}

#[test]
fn broken_config_falls_back_to_defaults_when_flags_cover_everything() {
    let cfg = effective_config(false, || Err(anyhow!("unwritable config dir"))).unwrap();
    assert_eq!(cfg.chunk_size, HashmendConfig::default().chunk_size);
}

#[test]
fn invalid_config_is_treated_like_a_broken_one() {
    let zero_chunk = || {
        Ok(HashmendConfig {
            chunk_size: 0,
            ..HashmendConfig::default()
        })
    };
    assert!(effective_config(true, zero_chunk).is_err());
    assert_eq!(effective_config(false, zero_chunk).unwrap().chunk_size, 4096);
}

#[test]
fn loaded_config_is_used_when_valid() {
    let custom = || {
        Ok(HashmendConfig {
            chunk_size: 65536,
            ..HashmendConfig::default()
        })
    };
    assert_eq!(effective_config(false, custom).unwrap().chunk_size, 65536);
    assert_eq!(effective_config(true, custom).unwrap().chunk_size, 65536);
}
