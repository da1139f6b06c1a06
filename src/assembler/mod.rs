//! Output assembly.
//!
//! Once the collection is complete, the [`FileAssembler`] derives the
//! containment tree and walks it from every direct child of the run's root.
//! Each component renders its fragments from the fragments its contained
//! children produced (bucketed by the children's content types). A component
//! that provides a file turns its fragments into that file; any other
//! component passes its fragments up to its own container.
//!
//! File paths are prefixed with the base paths of the roots above the file's
//! component, then tokens in path and content are replaced using the table of
//! the closest requesting root, longest token first.

pub mod extension;

pub use extension::{DirectoryExtension, EmptyExtension, ExistingExtension, MemoryExtension};

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::collection::{ComponentCollection, ComponentId, ContainmentTree};
use crate::component::{ChildContents, FileInfo};
use crate::core::{ExtgenError, Result};

/// One assembled output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Final file content
    pub content: String,
    /// The file already existed in the extension
    pub exists: bool,
    /// The content was merged with the existing file
    pub merged: bool,
}

/// Relative path to assembled file, in assembly order.
pub type GeneratedFiles = IndexMap<String, GeneratedFile>;

struct PendingFile {
    id: ComponentId,
    info: FileInfo,
}

/// Assembles output files from a finished collection.
pub struct FileAssembler<'e> {
    extension: &'e dyn ExistingExtension,
}

impl<'e> FileAssembler<'e> {
    /// Create an assembler checking files against `extension`.
    pub fn new(extension: &'e dyn ExistingExtension) -> Self {
        Self {
            extension,
        }
    }

    /// Lock the collection, derive containment and assemble every file.
    pub fn assemble(&self, collection: &mut ComponentCollection) -> Result<GeneratedFiles> {
        let tree = collection.derive_containment_tree()?.clone();
        let collection = &*collection;
        let Some(root) = collection.root() else {
            return Ok(GeneratedFiles::new());
        };

        let mut pending = Vec::new();
        for child in tree.children(root) {
            let fragments = collect_contents(collection, &tree, *child, &mut pending)?;
            if !fragments.is_empty() {
                tracing::warn!(
                    "'{}' rendered fragments outside of any file",
                    collection.request_path(*child)
                );
            }
        }

        let mut files = GeneratedFiles::new();
        let mut owners: HashMap<String, ComponentId> = HashMap::new();
        for PendingFile {
            id,
            info,
        } in pending
        {
            let (path, file) = self.assemble_file(collection, root, id, info)?;
            if let Some(first) = owners.get(&path) {
                return Err(ExtgenError::DuplicateFile {
                    path,
                    first: collection.request_path(*first).to_string(),
                    second: collection.request_path(id).to_string(),
                });
            }
            tracing::debug!(
                "Assembled {} from '{}'{}",
                path,
                collection.request_path(id),
                if file.merged { " (merged)" } else { "" }
            );
            owners.insert(path.clone(), id);
            files.insert(path, file);
        }

        tracing::info!("Assembled {} files", files.len());
        Ok(files)
    }

    fn assemble_file(
        &self,
        collection: &ComponentCollection,
        run_root: ComponentId,
        id: ComponentId,
        info: FileInfo,
    ) -> Result<(String, GeneratedFile)> {
        let scope = if collection.is_root(id) {
            id
        } else {
            collection.closest_root(id).unwrap_or(run_root)
        };
        let replacements = collection.component(scope).replacements();

        let mut prefixes = Vec::new();
        let mut current = Some(scope);
        while let Some(root) = current {
            if root != run_root {
                if let Some(base) = collection.component(root).base_path() {
                    prefixes.push(base);
                }
            }
            current = collection.closest_root(root);
        }
        prefixes.reverse();
        prefixes.push(info.path);

        let path = normalize_path(&replace_tokens(&prefixes.join("/"), &replacements));
        let mut content = replace_tokens(&join_fragments(&info.body), &replacements);

        let exists = self.extension.exists(&path);
        let mut merged = false;
        if exists && info.merge_existing {
            if let Some(existing) = self.extension.read(&path)? {
                let result = collection
                    .component(id)
                    .merge_with_existing(&existing, &content)
                    .map_err(|error| render_failed(collection, id, &error))?;
                if let Some(result) = result {
                    content = result;
                    merged = true;
                }
            }
        }

        Ok((
            path,
            GeneratedFile {
                content,
                exists,
                merged,
            },
        ))
    }
}

/// Render `id`'s subtree, queueing files. Returns the fragments `id` passes
/// to its container.
fn collect_contents(
    collection: &ComponentCollection,
    tree: &ContainmentTree,
    id: ComponentId,
    pending: &mut Vec<PendingFile>,
) -> Result<Vec<String>> {
    let mut children = ChildContents::new();
    for child in tree.children(id) {
        let fragments = collect_contents(collection, tree, *child, pending)?;
        if fragments.is_empty() {
            continue;
        }
        let content_type = collection.component(*child).content_type();
        if content_type.is_empty() {
            tracing::warn!(
                "'{}' has no content type, dropping its fragments",
                collection.request_path(*child)
            );
            continue;
        }
        children.extend(content_type, fragments);
    }

    let component = collection.component(id);
    let contents = component.contents(&children).map_err(|error| render_failed(collection, id, &error))?;
    match component.file_info(&contents) {
        Some(info) => {
            pending.push(PendingFile {
                id,
                info,
            });
            Ok(Vec::new())
        }
        None => Ok(contents),
    }
}

fn render_failed(collection: &ComponentCollection, id: ComponentId, error: &anyhow::Error) -> ExtgenError {
    ExtgenError::RenderFailed {
        path: collection.request_path(id).to_string(),
        reason: format!("{error:#}"),
    }
}

/// Replace tokens, longest first so `%module_name` wins over `%module`.
pub fn replace_tokens(text: &str, replacements: &IndexMap<String, String>) -> String {
    let mut tokens: Vec<(&String, &String)> = replacements.iter().collect();
    tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let mut result = text.to_string();
    for (token, value) in tokens {
        if !token.is_empty() {
            result = result.replace(token.as_str(), value);
        }
    }
    result
}

/// Join fragments with newlines, ending the file with exactly one.
fn join_fragments(body: &[String]) -> String {
    let joined = body.join("\n");
    let trimmed = joined.trim_end_matches('\n');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

/// Collapse empty and `.` segments and strip leading slashes.
fn normalize_path(path: &str) -> String {
    path.split('/').filter(|segment| !segment.is_empty() && *segment != ".").collect::<Vec<_>>().join("/")
}
