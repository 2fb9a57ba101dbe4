// src/watch/path_utils.rs

//! Path helpers shared by the watcher and the router.

use std::path::Path;

/// Render a path with forward slashes, whatever the platform.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Falls back to canonicalized paths when a plain `strip_prefix` fails
/// (symlinked roots, `/private/var` on macOS). Returns `None` if the path
/// lies outside `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(slash_path(rel));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(slash_path(rel));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn relative_inside_root() {
        let root = PathBuf::from("/proj");
        let path = PathBuf::from("/proj/app/src/commonMain/composeResources/values/strings.xml");
        assert_eq!(
            relative_str(&root, &path).as_deref(),
            Some("app/src/commonMain/composeResources/values/strings.xml")
        );
    }

    #[test]
    fn outside_root_is_none() {
        let root = PathBuf::from("/proj-that-does-not-exist");
        let path = PathBuf::from("/elsewhere/file.txt");
        assert_eq!(relative_str(&root, &path), None);
    }
}
