//! Line-oriented manifest parsing.

use super::{Manifest, DELIMITER};

/// Parses manifest text. Lines that do not split into exactly two fields
/// are dropped; field contents are not validated.
pub fn parse_manifest(text: &str) -> Manifest {
    let mut manifest = Manifest::new();
    for line in text.lines() {
        let mut fields = line.trim().split(DELIMITER);
        let (Some(path), Some(hash), None) = (fields.next(), fields.next(), fields.next()) else {
            continue;
        };
        manifest.insert(path.to_string(), hash.to_string());
    }
    manifest
}
