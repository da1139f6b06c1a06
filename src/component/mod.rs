//! The per-component contract.
//!
//! A component is one instantiated, typed unit of generated output: a class,
//! a file, or a declaration inside a file. The collector and the collection
//! only ever talk to components through the [`Component`] trait, which covers
//! the three phases of a generation run:
//!
//! 1. **Expansion**: [`Component::required_components`] names further
//!    sub-components, [`Component::merge_tag`] lets the collector detect
//!    duplicates, and [`Component::merge_incoming_data`] absorbs them.
//! 2. **Containment**: [`Component::containing_component`] declares where the
//!    component sits in the output tree (see the token grammar in
//!    [`crate::collection`]).
//! 3. **Assembly**: [`Component::contents`] renders fragments from the
//!    fragments of contained children, and [`Component::file_info`] turns them
//!    into a file when the component provides one.
//!
//! Root components additionally expose the replacement table used for token
//! substitution in file paths and contents.

pub mod merge;

pub use merge::{MergeConflict, merge_data};

use std::fmt;

use indexmap::IndexMap;

use crate::core::{ComponentData, Result};

/// Fragments rendered by contained children, bucketed by content type.
#[derive(Debug, Clone, Default)]
pub struct ChildContents {
    buckets: IndexMap<String, Vec<String>>,
}

impl ChildContents {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fragments under a content type.
    pub fn extend(&mut self, content_type: &str, fragments: impl IntoIterator<Item = String>) {
        self.buckets.entry(content_type.to_string()).or_default().extend(fragments);
    }

    /// Fragments of one content type.
    pub fn get(&self, content_type: &str) -> &[String] {
        self.buckets.get(content_type).map(Vec::as_slice).unwrap_or_default()
    }

    /// All fragments, in child order within each bucket.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.buckets.values().flatten()
    }

    /// Whether no child contributed anything.
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

/// A file a component provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Path relative to the owning root's base path; may contain tokens
    pub path: String,
    /// Ordered fragments, joined with newlines on assembly
    pub body: Vec<String>,
    /// Attempt to merge with the file when it already exists on disk
    pub merge_existing: bool,
}

impl FileInfo {
    /// A file that overwrites any existing content.
    pub fn new(path: impl Into<String>, body: Vec<String>) -> Self {
        Self {
            path: path.into(),
            body,
            merge_existing: false,
        }
    }

    /// Mark the file as mergeable with existing content.
    #[must_use]
    pub fn mergeable(mut self) -> Self {
        self.merge_existing = true;
        self
    }
}

/// Contract every concrete component type implements.
///
/// Type, identity and address are owned by the collection; a component only
/// knows its own prepared data.
pub trait Component: fmt::Debug {
    /// The prepared data this component was built from (after merges).
    fn data(&self) -> &ComponentData;

    /// Mutable access for merging.
    fn data_mut(&mut self) -> &mut ComponentData;

    /// Whether this component roots a generation (possibly nested).
    fn is_root(&self) -> bool {
        false
    }

    /// Deduplication tag. May contain `%requester`, substituted with the
    /// requester's request path.
    fn merge_tag(&self) -> Option<String> {
        None
    }

    /// Containment token; `None` keeps the component out of the output tree.
    fn containing_component(&self) -> Option<String> {
        None
    }

    /// Further sub-components, local name to data subtree.
    fn required_components(&self) -> Result<IndexMap<String, ComponentData>> {
        Ok(IndexMap::new())
    }

    /// Absorb data from a duplicate request. Returns whether anything new
    /// was absorbed.
    fn merge_incoming_data(
        &mut self,
        incoming: &ComponentData,
    ) -> std::result::Result<bool, MergeConflict> {
        merge_data(self.data_mut(), incoming)
    }

    /// Bucket under which this component's fragments reach its container.
    fn content_type(&self) -> &str {
        ""
    }

    /// Render this component's fragments.
    fn contents(&self, _children: &ChildContents) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// The file this component provides, built from its rendered fragments.
    fn file_info(&self, _contents: &[String]) -> Option<FileInfo> {
        None
    }

    /// Merge generated content with content already on disk.
    ///
    /// Only called for files marked [`FileInfo::mergeable`]. `Ok(None)` keeps
    /// the generated content unchanged.
    fn merge_with_existing(&self, _existing: &str, _generated: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    /// Token replacements this root exposes to the components it roots.
    fn replacements(&self) -> IndexMap<String, String> {
        IndexMap::new()
    }

    /// Directory this root's files live under, relative to its own root.
    fn base_path(&self) -> Option<String> {
        None
    }
}
