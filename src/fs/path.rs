//! Path-string helpers consumed by the command layer. They reach the tree
//! only through `find_dir`, so `.` and `..` behave exactly as the nodes do.

use crate::fs::dir::{Dir, FsError, SEPARATOR};

/// Splits a path into its directory portion and final component. A path
/// without a separator has an empty directory portion; a trailing separator
/// leaves the final component empty (name validation rejects it later).
pub fn split(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(0) => (&path[..1], &path[1..]),
        Some(at) => (&path[..at], &path[at + 1..]),
        None => ("", path),
    }
}

/// Resolves a directory portion by walking `find_dir` segment by segment,
/// starting from `root` when the portion is absolute and from `cwd`
/// otherwise. Empty segments are skipped, so doubled separators are
/// harmless.
pub fn resolve(path: &str, cwd: &Dir, root: &Dir) -> Result<Dir, FsError> {
    let mut current = if path.starts_with(SEPARATOR) {
        root.clone()
    } else {
        cwd.clone()
    };
    for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
        current = current.find_dir(segment)?;
    }
    Ok(current)
}
