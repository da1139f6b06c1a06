//! Read model of the extension being generated into.
//!
//! Assembly asks whether a generated path already exists and, for mergeable
//! files, what it currently contains. Paths are relative, `/`-separated and
//! carry no leading slash.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::core::Result;

/// Existing files of the target extension.
pub trait ExistingExtension {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Current content of the file at `path`, if any.
    fn read(&self, path: &str) -> Result<Option<String>>;
}

/// An extension with no files yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyExtension;

impl ExistingExtension for EmptyExtension {
    fn exists(&self, _path: &str) -> bool {
        false
    }

    fn read(&self, _path: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// An extension on disk.
///
/// The file list is gathered once when the extension is opened; contents are
/// read on demand.
#[derive(Debug, Clone)]
pub struct DirectoryExtension {
    root: PathBuf,
    files: BTreeSet<String>,
}

impl DirectoryExtension {
    /// Scan `root`. A missing directory is an empty extension.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let mut files = BTreeSet::new();

        if root.is_dir() {
            for entry in WalkDir::new(&root).follow_links(false) {
                let entry = entry.map_err(std::io::Error::from)?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Ok(relative) = entry.path().strip_prefix(&root) {
                    files.insert(to_relative_path(relative));
                }
            }
        }

        tracing::debug!("Found {} existing files under {}", files.len(), root.display());
        Ok(Self {
            root,
            files,
        })
    }

    /// Directory of the extension.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths of all existing files, sorted.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }
}

impl ExistingExtension for DirectoryExtension {
    fn exists(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    fn read(&self, path: &str) -> Result<Option<String>> {
        if !self.exists(path) {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(self.root.join(path))?))
    }
}

/// An in-memory extension, path to content.
#[derive(Debug, Clone, Default)]
pub struct MemoryExtension {
    files: IndexMap<String, String>,
}

impl MemoryExtension {
    /// Create an empty in-memory extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style file insertion.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl ExistingExtension for MemoryExtension {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &str) -> Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }
}

fn to_relative_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
