//! File names for cached images.
//!
//! Names come from the APOD title, the extension from the image URL.

use std::path::{Path, PathBuf};

/// Extension used when the URL has none
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Base name used when nothing survives title sanitising
const UNTITLED: &str = "untitled";

/// Hex chars of the content hash appended on a name collision
const HASH_SUFFIX_LEN: usize = 8;

/// Path for an image titled `title` downloaded from `url`, inside `dir`
pub fn derive_path(dir: &Path, title: &str, url: &str) -> PathBuf {
    dir.join(format!("{}.{}", base_name(title), extension(url)))
}

/// Like [`derive_path`] with a short content hash fragment appended to the
/// base name, for when the plain name is already taken by another image
pub fn derive_unique_path(dir: &Path, title: &str, url: &str, content_hash: &str) -> PathBuf {
    let fragment: String = content_hash.chars().take(HASH_SUFFIX_LEN).collect();
    dir.join(format!(
        "{}_{}.{}",
        base_name(title),
        fragment,
        extension(url)
    ))
}

/// Title with non-alphanumeric characters removed and whitespace runs
/// collapsed into single underscores
pub fn base_name(title: &str) -> String {
    let kept: String = title
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let name = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

/// Extension of the last path segment of `url`
pub fn extension(url: &str) -> &str {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();

    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => ext,
        _ => DEFAULT_EXTENSION,
    }
}
