// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
    /// Exists, but every read fails (permission denied and friends).
    Unreadable { dir: bool },
}

/// In-memory filesystem for tests. Paths are used verbatim; tests should use
/// absolute paths.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.entries();
        files.insert(path.clone(), MockEntry::File(content.into()));
        link_into_parent(&mut files, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.entries();
        ensure_dir_entry(&mut files, &path);
    }

    /// Register a file (or directory) that exists but cannot be read.
    pub fn add_unreadable(&self, path: impl AsRef<Path>, dir: bool) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.entries();
        files.insert(path.clone(), MockEntry::Unreadable { dir });
        link_into_parent(&mut files, &path);
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.entries();
        files.retain(|p, _| !p.starts_with(path));
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str())) {
            if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
                children.retain(|c| c != name);
            }
        }
    }
}

fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    if parent.as_os_str().is_empty() {
        return;
    }
    ensure_dir_entry(files, parent);
    if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if files.contains_key(path) {
        return;
    }
    files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_into_parent(files, path);
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.entries();
        match files.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) | Some(MockEntry::Unreadable { dir: true }) => {
                Err(anyhow!("Is a directory: {:?}", path))
            }
            Some(MockEntry::Unreadable { dir: false }) => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(
            self.entries().get(path),
            Some(MockEntry::File(_)) | Some(MockEntry::Unreadable { dir: false })
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(
            self.entries().get(path),
            Some(MockEntry::Dir(_)) | Some(MockEntry::Unreadable { dir: true })
        )
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.entries();
        match files.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::Unreadable { dir: true }) => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
