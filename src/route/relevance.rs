// src/route/relevance.rs

//! Cheap, allocation-light checks run for every filesystem event.
//!
//! All functions operate on forward-slash path strings (see
//! [`crate::watch::path_utils::slash_path`]).

use crate::types::DEFAULT_SOURCE_SET;

/// Directory name whose contents feed the accessor generator.
pub const CANONICAL_RESOURCE_DIR: &str = "composeResources";

/// Anything under a build output directory is never routed.
pub const BUILD_OUTPUT_SEGMENT: &str = "/build/";

/// Canonical resource directory name followed by the user-configured ones.
pub fn resource_dir_names(extra_dirs: &[String]) -> impl Iterator<Item = &str> {
    std::iter::once(CANONICAL_RESOURCE_DIR).chain(
        extra_dirs
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty()),
    )
}

/// Is this path one the router should look at?
pub fn is_relevant_path(path: &str, extra_dirs: &[String]) -> bool {
    if is_build_output(path) {
        return false;
    }
    resource_anchor(path, extra_dirs).is_some()
}

pub fn is_build_output(path: &str) -> bool {
    path.contains(BUILD_OUTPUT_SEGMENT)
}

/// The directory that contains the resource directory, i.e. everything
/// before `/<resourceDir>` where `<resourceDir>` is a whole path segment.
pub fn resource_anchor<'a>(path: &'a str, extra_dirs: &[String]) -> Option<&'a str> {
    resource_dir_names(extra_dirs).find_map(|name| anchor_for(path, name))
}

fn anchor_for<'a>(path: &'a str, dir_name: &str) -> Option<&'a str> {
    let segment = format!("/{dir_name}/");
    if let Some(idx) = path.find(&segment) {
        return Some(&path[..idx]);
    }
    path.strip_suffix(&format!("/{dir_name}"))
}

/// Source set named by an anchor of the form `.../src/<name>`, or the
/// conventional common source set otherwise.
pub fn source_set_of(anchor: &str) -> String {
    if let Some((head, name)) = anchor.rsplit_once('/') {
        let under_src = head == "src" || head.ends_with("/src");
        if under_src && !name.is_empty() {
            return name.to_string();
        }
    }
    DEFAULT_SOURCE_SET.to_string()
}
