// src/watch/ignore.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::watch::path_utils::relative_str;

/// User ignore globs, evaluated against paths relative to the project root.
#[derive(Clone)]
pub struct IgnoreSet {
    root: PathBuf,
    set: Option<GlobSet>,
}

impl fmt::Debug for IgnoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreSet")
            .field("root", &self.root)
            .field("patterns", &self.set.as_ref().map_or(0, GlobSet::len))
            .finish()
    }
}

impl IgnoreSet {
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        let root = root.into();
        if patterns.is_empty() {
            return Ok(Self { root, set: None });
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid ignore pattern '{pattern}'"))?;
            builder.add(glob);
        }
        let set = builder.build().context("building ignore globset")?;
        Ok(Self {
            root,
            set: Some(set),
        })
    }

    /// An empty set that ignores nothing.
    pub fn none(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            set: None,
        }
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let Some(ref set) = self.set else {
            return false;
        };
        match relative_str(&self.root, path) {
            Some(rel) => set.is_match(rel),
            None => false,
        }
    }
}
