//! Component type resolution.
//!
//! A component type is a named category of generatable unit ("Module",
//! "Permission", "PhpClass"). Each type maps to one [`ComponentKind`]: a schema
//! builder plus a constructor for component instances. A kind may be
//! specialized for an environment version by registering it under the type
//! name with the numeric version appended (`InfoFile7` specializes `InfoFile`
//! for core version 7); [`TypeResolver::resolve`] prefers the specialization
//! when one exists for the configured version.
//!
//! Resolution results are cached for the lifetime of the resolver. The
//! resolver does not reject unknown names at resolve time: callers check
//! existence with [`TypeResolver::kind_for`] before instantiating.

use std::fmt;

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::component::Component;
use crate::constants::{MAX_TYPE_SUGGESTIONS, TYPE_SUGGESTION_DISTANCE};
use crate::core::{ComponentData, ExtgenError, Result};
use crate::schema::{PropertyList, SchemaIntrospector};

/// Builds the property schema of a component type.
pub type SchemaBuilder = fn(&SchemaIntrospector) -> Result<PropertyList>;

/// Builds a component instance from prepared data.
pub type ComponentBuilder = fn(ComponentData) -> Box<dyn Component>;

/// A concrete component implementation.
#[derive(Clone, Copy)]
pub struct ComponentKind {
    /// Concrete type name, including any version suffix
    pub name: &'static str,
    /// One-line description for listings
    pub description: &'static str,
    /// Schema builder
    pub schema: SchemaBuilder,
    /// Instance constructor
    pub build: ComponentBuilder,
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentKind").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Resolves abstract type names to concrete component kinds.
pub struct TypeResolver {
    core_version: u32,
    kinds: IndexMap<String, ComponentKind>,
    cache: DashMap<String, String>,
}

impl TypeResolver {
    /// Create an empty resolver for an environment version.
    pub fn new(core_version: u32) -> Self {
        Self {
            core_version,
            kinds: IndexMap::new(),
            cache: DashMap::new(),
        }
    }

    /// Create a resolver with a set of kinds.
    pub fn with_kinds(core_version: u32, kinds: impl IntoIterator<Item = ComponentKind>) -> Self {
        let mut resolver = Self::new(core_version);
        for kind in kinds {
            resolver.register(kind);
        }
        resolver
    }

    /// Register a kind, replacing any kind with the same concrete name.
    pub fn register(&mut self, kind: ComponentKind) {
        self.kinds.insert(kind.name.to_string(), kind);
        self.cache.clear();
    }

    /// The environment version used for specialization.
    pub fn core_version(&self) -> u32 {
        self.core_version
    }

    /// Normalize the leading case of a type name: `permission` -> `Permission`.
    pub fn normalize(&self, name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Resolve a type name to the concrete name to instantiate.
    ///
    /// Returns `<Name><version>` when such a kind is registered, otherwise the
    /// normalized name itself, whether or not it exists.
    pub fn resolve(&self, name: &str) -> String {
        let normalized = self.normalize(name);
        if let Some(hit) = self.cache.get(&normalized) {
            return hit.value().clone();
        }

        let specialized = format!("{normalized}{}", self.core_version);
        let concrete = if self.kinds.contains_key(&specialized) {
            tracing::trace!("Type {} specialized as {}", normalized, specialized);
            specialized
        } else {
            normalized.clone()
        };

        self.cache.insert(normalized, concrete.clone());
        concrete
    }

    /// The kind registered under a concrete name.
    pub fn kind(&self, concrete: &str) -> Option<&ComponentKind> {
        self.kinds.get(concrete)
    }

    /// Resolve and look up a kind, failing for unknown types.
    pub fn kind_for(&self, name: &str) -> Result<&ComponentKind> {
        let concrete = self.resolve(name);
        self.kind(&concrete).ok_or_else(|| ExtgenError::UnknownComponentType {
            component_type: self.normalize(name),
            suggestions: self.suggestions(name),
        })
    }

    /// Whether a type name resolves to a registered kind.
    pub fn exists(&self, name: &str) -> bool {
        self.kind(&self.resolve(name)).is_some()
    }

    /// Registered type names close to `name`.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        let normalized = self.normalize(name);
        let mut scored: Vec<(usize, &String)> = self
            .kinds
            .keys()
            .map(|candidate| (strsim::levenshtein(&normalized, candidate), candidate))
            .filter(|(distance, _)| *distance <= TYPE_SUGGESTION_DISTANCE)
            .collect();
        scored.sort();
        scored.into_iter().take(MAX_TYPE_SUGGESTIONS).map(|(_, name)| name.clone()).collect()
    }

    /// All registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &ComponentKind> {
        self.kinds.values()
    }

    /// Abstract type names mapped to their version specializations.
    pub fn type_families(&self) -> IndexMap<String, Vec<String>> {
        let mut families: IndexMap<String, Vec<String>> = IndexMap::new();
        for name in self.kinds.keys() {
            let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
            if base.len() == name.len() || !self.kinds.contains_key(base) {
                families.entry(name.clone()).or_default();
            } else {
                families.entry(base.to_string()).or_default().push(name.clone());
            }
        }
        families
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeResolver")
            .field("core_version", &self.core_version)
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{fixture_kinds, kind, thing_schema};

    #[test]
    fn test_normalize_leading_case() {
        let resolver = TypeResolver::new(10);
        assert_eq!(resolver.normalize("permission"), "Permission");
        assert_eq!(resolver.normalize("PhpClass"), "PhpClass");
        assert_eq!(resolver.normalize(""), "");
    }

    #[test]
    fn test_version_specialization() {
        let mut resolver = TypeResolver::with_kinds(10, fixture_kinds());
        resolver.register(kind("Thing10", thing_schema));
        assert_eq!(resolver.resolve("thing"), "Thing10");
        assert_eq!(resolver.resolve("Widget"), "Widget");

        let legacy = TypeResolver::with_kinds(7, fixture_kinds());
        assert_eq!(legacy.resolve("Thing"), "Thing");
    }

    #[test]
    fn test_register_clears_cache() {
        let mut resolver = TypeResolver::with_kinds(10, fixture_kinds());
        assert_eq!(resolver.resolve("Thing"), "Thing");
        resolver.register(kind("Thing10", thing_schema));
        assert_eq!(resolver.resolve("Thing"), "Thing10");
    }

    #[test]
    fn test_unknown_type_suggestions() {
        let resolver = TypeResolver::with_kinds(10, fixture_kinds());
        assert!(resolver.resolve("Wigdet") == "Wigdet");
        let err = resolver.kind_for("wigdet").unwrap_err();
        match err {
            ExtgenError::UnknownComponentType {
                component_type,
                suggestions,
            } => {
                assert_eq!(component_type, "Wigdet");
                assert_eq!(suggestions.first().map(String::as_str), Some("Widget"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_type_families() {
        let mut resolver = TypeResolver::with_kinds(10, fixture_kinds());
        resolver.register(kind("Thing7", thing_schema));
        let families = resolver.type_families();
        assert_eq!(families["Thing"], vec!["Thing7".to_string()]);
        assert!(!families.contains_key("Thing7"));
    }
}
