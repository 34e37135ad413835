//! Remote URL resolution for files under the target root.
//!
//! The URL is the base URL followed by the file's root-relative path with
//! forward slashes. Nothing is percent-encoded, so paths containing spaces,
//! `#`, `?` and similar characters produce URLs the server may not resolve.

use std::path::{Component, Path};

/// Path of `resolved` relative to `root`, with every separator turned into `/`.
///
/// Returns `None` if no relative path exists (e.g. `resolved` is relative
/// while `root` is absolute).
pub fn relative_remote_path(root: &Path, resolved: &Path) -> Option<String> {
    let rel = pathdiff::diff_paths(resolved, root)?;
    let normalized = forward_slashes(&rel);
    if normalized.is_empty() {
        return None;
    }
    Some(normalized)
}

/// True if `resolved` leads out of `root` through a `..` component.
///
/// Paths are compared lexically; `root/a/../../x` escapes even though no
/// such directory needs to exist.
pub fn escapes_root(root: &Path, resolved: &Path) -> bool {
    pathdiff::diff_paths(resolved, root)
        .map_or(false, |rel| rel.components().any(|c| c == Component::ParentDir))
}

/// Renders a relative path with `/` separators, whatever the platform.
pub fn forward_slashes(rel: &Path) -> String {
    rel.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
        .replace('\\', "/")
}

/// Builds `<base_url>/<relative path>` for a resolved local file.
pub fn remote_url(base_url: &str, root: &Path, resolved: &Path) -> Option<String> {
    let rel = relative_remote_path(root, resolved)?;
    Some(join_url(base_url, &rel))
}

fn join_url(base_url: &str, rel: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        rel.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const BASE: &str = "https://example.com/tree";

    #[test]
    fn nested_file() {
        let root = PathBuf::from("/data/Plutonium");
        let file = root.join("storage").join("iw5").join("mod.ff");
        assert_eq!(
            remote_url(BASE, &root, &file).as_deref(),
            Some("https://example.com/tree/storage/iw5/mod.ff")
        );
    }

    #[test]
    fn trailing_slash_on_base_is_not_doubled() {
        let root = PathBuf::from("/r");
        assert_eq!(
            remote_url("https://example.com/tree/", &root, &root.join("a.txt")).as_deref(),
            Some("https://example.com/tree/a.txt")
        );
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        let root = PathBuf::from("/r");
        let file = root.join("sub\\b.txt");
        assert_eq!(
            relative_remote_path(&root, &file).as_deref(),
            Some("sub/b.txt")
        );
    }

    #[test]
    fn no_percent_encoding() {
        let root = PathBuf::from("/r");
        let file = root.join("My Files").join("a b.txt");
        assert_eq!(
            remote_url(BASE, &root, &file).as_deref(),
            Some("https://example.com/tree/My Files/a b.txt")
        );
    }

    #[test]
    fn relative_path_against_absolute_root_has_no_url() {
        let root = PathBuf::from("/r");
        assert_eq!(remote_url(BASE, &root, Path::new("a.txt")), None);
    }

    #[test]
    fn parent_components_escape_root() {
        let root = PathBuf::from("/r");
        assert!(escapes_root(&root, &root.join("../escaped/x")));
        assert!(escapes_root(&root, &root.join("a/../../x")));
        assert!(escapes_root(&root, Path::new("/elsewhere/x")));
        assert!(!escapes_root(&root, &root.join("sub/x")));
        assert!(!escapes_root(&root, &root.join("/r/sub/x")));
    }

    #[test]
    fn root_itself_has_no_url() {
        let root = PathBuf::from("/r");
        assert_eq!(remote_url(BASE, &root, &root), None);
    }
}
