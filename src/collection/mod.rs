//! The component collection: registry of one generation run.
//!
//! Components live in an arena and are addressed by [`ComponentId`]. Every
//! relationship the engine needs is stored as index-based side tables:
//!
//! - **requester**: the component whose expansion created this one
//! - **closest requesting root**: the nearest root found by walking the
//!   requester chain, excluding the component itself, so a nested root (a
//!   test module inside a module) reports the outer module
//! - **local names**: per requester, the name each child was requested under
//!   (aliases for merged duplicates included)
//! - **request paths**: slash-joined local names from the run's root
//! - **merge tags**: `(closest root, type, tag)` to the component holding it
//!
//! Once expansion is finished the caller derives the [`ContainmentTree`],
//! which locks the collection against further registrations.

pub mod containment;

pub use containment::{ContainmentTree, TokenStep, parse_token};

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::component::Component;
use crate::constants::{REQUEST_PATH_SEPARATOR, TOKEN_REQUESTER};
use crate::core::{ExtgenError, Result};

/// Stable handle of a registered component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    /// Registration index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type MergeKey = (Option<ComponentId>, String, String);

struct Entry {
    component: Box<dyn Component>,
    component_type: String,
    concrete_type: String,
    local_name: String,
    requester: Option<ComponentId>,
    closest_root: Option<ComponentId>,
    request_path: String,
    is_root: bool,
}

/// Registry of the components of one generation run.
#[derive(Default)]
pub struct ComponentCollection {
    entries: Vec<Entry>,
    root: Option<ComponentId>,
    local_names: HashMap<ComponentId, IndexMap<String, ComponentId>>,
    merge_tags: HashMap<MergeKey, ComponentId>,
    request_paths: HashMap<String, ComponentId>,
    locked: bool,
    tree: Option<ContainmentTree>,
}

impl ComponentCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new component.
    ///
    /// The first registration establishes the run's root and must not have
    /// a requester; every later one must. The collection takes ownership of
    /// the component, so the same instance can never be registered twice.
    pub fn register(
        &mut self,
        local_name: &str,
        component_type: &str,
        component: Box<dyn Component>,
        requester: Option<ComponentId>,
    ) -> Result<ComponentId> {
        self.register_resolved(local_name, component_type, component_type, component, requester)
    }

    /// Register a component whose type resolved to a version specialization.
    ///
    /// `component_type` keys the merge-tag table, so a specialized instance
    /// still merges with requests for its base type; `concrete_type` is what
    /// was actually built.
    pub fn register_resolved(
        &mut self,
        local_name: &str,
        component_type: &str,
        concrete_type: &str,
        component: Box<dyn Component>,
        requester: Option<ComponentId>,
    ) -> Result<ComponentId> {
        if self.locked {
            return Err(ExtgenError::RegistryLocked {
                local_name: local_name.to_string(),
            });
        }
        if requester.is_none() && self.root.is_some() {
            return Err(ExtgenError::OrphanComponent {
                local_name: local_name.to_string(),
            });
        }

        let request_path = match requester {
            Some(requester) => format!(
                "{}{}{}",
                self.entry(requester).request_path,
                REQUEST_PATH_SEPARATOR,
                local_name
            ),
            None => local_name.to_string(),
        };
        let taken = requester.is_some_and(|r| self.local_child(r, local_name).is_some());
        if taken || self.request_paths.contains_key(&request_path) {
            return Err(ExtgenError::DuplicateLocalName {
                requester: requester
                    .map(|r| self.entry(r).request_path.clone())
                    .unwrap_or_default(),
                local_name: local_name.to_string(),
            });
        }

        let tag = self.merge_tag_for(component_type, component.as_ref(), requester)?;
        let scope = self.scope_for(requester);
        let id = ComponentId(self.entries.len());
        let is_root = component.is_root();

        tracing::debug!(
            "Registered {} '{}' as {}{}",
            concrete_type,
            request_path,
            id,
            if is_root { " (root)" } else { "" }
        );

        self.entries.push(Entry {
            component,
            component_type: component_type.to_string(),
            concrete_type: concrete_type.to_string(),
            local_name: local_name.to_string(),
            requester,
            closest_root: scope,
            request_path: request_path.clone(),
            is_root,
        });
        self.request_paths.insert(request_path, id);
        if let Some(requester) = requester {
            self.local_names.entry(requester).or_default().insert(local_name.to_string(), id);
        } else {
            self.root = Some(id);
        }
        if let Some(tag) = tag {
            self.merge_tags.insert((scope, component_type.to_string(), tag), id);
        }

        Ok(id)
    }

    /// Record `local_name` under `requester` as another name for an existing
    /// component, without registering anything new.
    pub fn register_alias(
        &mut self,
        local_name: &str,
        existing: ComponentId,
        requester: ComponentId,
    ) -> Result<()> {
        if self.locked {
            return Err(ExtgenError::RegistryLocked {
                local_name: local_name.to_string(),
            });
        }
        match self.local_child(requester, local_name) {
            Some(current) if current == existing => Ok(()),
            Some(_) => Err(ExtgenError::DuplicateLocalName {
                requester: self.entry(requester).request_path.clone(),
                local_name: local_name.to_string(),
            }),
            None => {
                tracing::trace!(
                    "Aliased '{}{}{}' to '{}'",
                    self.entry(requester).request_path,
                    REQUEST_PATH_SEPARATOR,
                    local_name,
                    self.entry(existing).request_path
                );
                self.local_names
                    .entry(requester)
                    .or_default()
                    .insert(local_name.to_string(), existing);
                Ok(())
            }
        }
    }

    /// The registered component a candidate duplicates, if any.
    ///
    /// Candidates without a requester (the root) never match. The lookup is
    /// scoped to the requester's closest root, or to the requester itself
    /// when it is a root.
    pub fn find_merge_candidate(
        &self,
        component_type: &str,
        candidate: &dyn Component,
        requester: Option<ComponentId>,
    ) -> Result<Option<ComponentId>> {
        if requester.is_none() {
            return Ok(None);
        }
        let Some(tag) = self.merge_tag_for(component_type, candidate, requester)? else {
            return Ok(None);
        };
        let key = (self.scope_for(requester), component_type.to_string(), tag);
        Ok(self.merge_tags.get(&key).copied())
    }

    /// The component's merge tag with `%requester` substituted.
    pub fn merge_tag_for(
        &self,
        component_type: &str,
        component: &dyn Component,
        requester: Option<ComponentId>,
    ) -> Result<Option<String>> {
        let Some(template) = component.merge_tag().filter(|tag| !tag.is_empty()) else {
            return Ok(None);
        };
        if !template.contains(TOKEN_REQUESTER) {
            return Ok(Some(template));
        }
        match requester {
            Some(requester) => Ok(Some(
                template.replace(TOKEN_REQUESTER, &self.entry(requester).request_path),
            )),
            None => Err(ExtgenError::MergeTagWithoutRequester {
                component_type: component_type.to_string(),
                tag: template,
            }),
        }
    }

    /// Derive the containment tree and lock the collection.
    ///
    /// The tree is computed once; later calls return the same tree.
    pub fn derive_containment_tree(&mut self) -> Result<&ContainmentTree> {
        self.locked = true;
        if self.tree.is_none() {
            let tree = self.build_containment_tree()?;
            tracing::debug!("Derived containment tree with {} edges", tree.len());
            self.tree = Some(tree);
        }
        Ok(self.tree.get_or_insert_with(ContainmentTree::default))
    }

    /// The containment tree, once derived.
    pub fn containment_tree(&self) -> Option<&ContainmentTree> {
        self.tree.as_ref()
    }

    /// Whether registrations are still accepted.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn build_containment_tree(&self) -> Result<ContainmentTree> {
        let mut tree = ContainmentTree::default();
        let mut graph: DiGraph<ComponentId, ()> = DiGraph::new();
        let mut nodes: HashMap<ComponentId, NodeIndex> = HashMap::new();

        for id in self.ids() {
            let Some(token) =
                self.entry(id).component.containing_component().filter(|t| !t.trim().is_empty())
            else {
                continue;
            };
            let parent = self.resolve_token(id, &token)?;
            if parent == id {
                return Err(self.unresolvable(id, &token, "the component would contain itself"));
            }
            tree.insert(parent, id);

            let parent_node = *nodes.entry(parent).or_insert_with(|| graph.add_node(parent));
            let child_node = *nodes.entry(id).or_insert_with(|| graph.add_node(id));
            graph.add_edge(parent_node, child_node, ());
        }

        if let Err(cycle) = toposort(&graph, None) {
            let start = graph[cycle.node_id()];
            let mut chain = vec![self.entry(start).request_path.clone()];
            let mut seen = HashSet::from([start]);
            let mut current = tree.parent(start);
            while let Some(next) = current {
                chain.push(self.entry(next).request_path.clone());
                if !seen.insert(next) {
                    break;
                }
                current = tree.parent(next);
            }
            return Err(ExtgenError::ContainmentCycle {
                chain: chain.join(" -> "),
            });
        }

        Ok(tree)
    }

    /// Resolve a containment token relative to `id`.
    pub fn resolve_token(&self, id: ComponentId, token: &str) -> Result<ComponentId> {
        let steps = parse_token(token);
        if steps.is_empty() {
            return Err(self.unresolvable(id, token, "empty token"));
        }

        let mut current = id;
        for step in steps {
            current = match step {
                TokenStep::Root => {
                    self.root.ok_or_else(|| self.unresolvable(id, token, "no root registered"))?
                }
                TokenStep::Requester => self.requester(current).ok_or_else(|| {
                    self.unresolvable(
                        id,
                        token,
                        &format!("'{}' has no requester", self.request_path(current)),
                    )
                })?,
                TokenStep::SelfRef => current,
                TokenStep::NearestRoot => self.closest_root(current).ok_or_else(|| {
                    self.unresolvable(
                        id,
                        token,
                        &format!("'{}' has no requesting root", self.request_path(current)),
                    )
                })?,
                TokenStep::Named(name) => self.local_child(current, &name).ok_or_else(|| {
                    self.unresolvable(
                        id,
                        token,
                        &format!(
                            "'{}' requested nothing named '{}'",
                            self.request_path(current),
                            name
                        ),
                    )
                })?,
            };
        }
        Ok(current)
    }

    fn unresolvable(&self, id: ComponentId, token: &str, reason: &str) -> ExtgenError {
        ExtgenError::UnresolvableContainmentToken {
            path: self.entry(id).request_path.clone(),
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Merge-tag scope for components requested by `requester`.
    fn scope_for(&self, requester: Option<ComponentId>) -> Option<ComponentId> {
        let requester = requester?;
        let entry = self.entry(requester);
        if entry.is_root {
            Some(requester)
        } else {
            entry.closest_root
        }
    }

    fn entry(&self, id: ComponentId) -> &Entry {
        &self.entries[id.0]
    }

    /// The run's root component.
    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    /// A registered component.
    pub fn component(&self, id: ComponentId) -> &dyn Component {
        self.entry(id).component.as_ref()
    }

    /// Mutable access to a registered component, for merging.
    pub fn component_mut(&mut self, id: ComponentId) -> &mut dyn Component {
        self.entries[id.0].component.as_mut()
    }

    /// Component type the component was requested as.
    pub fn component_type(&self, id: ComponentId) -> &str {
        &self.entry(id).component_type
    }

    /// Type the component was built as, after version specialization.
    pub fn concrete_type(&self, id: ComponentId) -> &str {
        &self.entry(id).concrete_type
    }

    /// Local name the component was first registered under.
    pub fn local_name(&self, id: ComponentId) -> &str {
        &self.entry(id).local_name
    }

    /// The component's requester.
    pub fn requester(&self, id: ComponentId) -> Option<ComponentId> {
        self.entry(id).requester
    }

    /// Nearest root above the component (never the component itself).
    pub fn closest_root(&self, id: ComponentId) -> Option<ComponentId> {
        self.entry(id).closest_root
    }

    /// Whether the component is a root.
    pub fn is_root(&self, id: ComponentId) -> bool {
        self.entry(id).is_root
    }

    /// Request path of the component.
    pub fn request_path(&self, id: ComponentId) -> &str {
        &self.entry(id).request_path
    }

    /// Component registered at a request path.
    pub fn find_by_path(&self, path: &str) -> Option<ComponentId> {
        self.request_paths.get(path).copied()
    }

    /// The child `requester` requested under `local_name`, aliases included.
    pub fn local_child(&self, requester: ComponentId, local_name: &str) -> Option<ComponentId> {
        self.local_names.get(&requester).and_then(|names| names.get(local_name)).copied()
    }

    /// Every local name `requester` used, in request order.
    pub fn local_children(&self, requester: ComponentId) -> Vec<(&str, ComponentId)> {
        self.local_names
            .get(&requester)
            .map(|names| names.iter().map(|(name, id)| (name.as_str(), *id)).collect())
            .unwrap_or_default()
    }

    /// All component ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + use<> {
        (0..self.entries.len()).map(ComponentId)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ComponentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCollection")
            .field(
                "components",
                &self.entries.iter().map(|e| e.request_path.as_str()).collect::<Vec<_>>(),
            )
            .field("locked", &self.locked)
            .finish()
    }
}
