//! Containment tokens and the derived containment tree.
//!
//! A component declares where it belongs in the output tree with a token:
//!
//! | Token | Resolves to |
//! |---|---|
//! | `%root` | the run's outermost root |
//! | `%requester` | the direct requester |
//! | `%self` | the current step (the component itself at the start) |
//! | `%nearest_root` | the closest requesting root of the current step |
//! | `name` | the child of the current step requested under local name `name` |
//!
//! Steps are joined with `:` and evaluated left to right starting from the
//! declaring component, so `%self:permissions_file` is "the component I
//! requested as `permissions_file`", and `%requester:%nearest_root` is "the
//! nearest root above my requester".

use std::collections::HashMap;

use indexmap::IndexMap;

use super::ComponentId;
use crate::constants::{TOKEN_NEAREST_ROOT, TOKEN_REQUESTER, TOKEN_ROOT, TOKEN_SELF, TOKEN_SEPARATOR};

/// One parsed step of a containment token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStep {
    /// `%root`
    Root,
    /// `%requester`
    Requester,
    /// `%self`
    SelfRef,
    /// `%nearest_root`
    NearestRoot,
    /// A local name
    Named(String),
}

/// Split a containment token into steps.
pub fn parse_token(token: &str) -> Vec<TokenStep> {
    token
        .split(TOKEN_SEPARATOR)
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(|step| match step {
            TOKEN_ROOT => TokenStep::Root,
            TOKEN_REQUESTER => TokenStep::Requester,
            TOKEN_SELF => TokenStep::SelfRef,
            TOKEN_NEAREST_ROOT => TokenStep::NearestRoot,
            other => TokenStep::Named(other.to_string()),
        })
        .collect()
}

/// Containing component to ordered contained children.
///
/// Children are listed in registration order, which is the order the
/// collector expanded them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainmentTree {
    children: IndexMap<ComponentId, Vec<ComponentId>>,
    parents: HashMap<ComponentId, ComponentId>,
}

impl ContainmentTree {
    pub(crate) fn insert(&mut self, parent: ComponentId, child: ComponentId) {
        self.children.entry(parent).or_default().push(child);
        self.parents.insert(child, parent);
    }

    /// Children contained directly in `parent`.
    pub fn children(&self, parent: ComponentId) -> &[ComponentId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or_default()
    }

    /// The component containing `child`, if it participates in the tree.
    pub fn parent(&self, child: ComponentId) -> Option<ComponentId> {
        self.parents.get(&child).copied()
    }

    /// Whether a component participates in the tree (as parent or child).
    pub fn contains(&self, id: ComponentId) -> bool {
        self.parents.contains_key(&id) || self.children.contains_key(&id)
    }

    /// Number of containment edges.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether the tree has no edges.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Parent/children pairs, in first-containment order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &[ComponentId])> {
        self.children.iter().map(|(parent, children)| (*parent, children.as_slice()))
    }
}
