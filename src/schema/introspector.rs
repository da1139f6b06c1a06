//! Schema introspection.
//!
//! The [`SchemaIntrospector`] turns a component type name into that type's
//! validated [`PropertyList`]. Schemas are built on first use and memoized per
//! resolved type for the lifetime of the introspector. A type's schema builder
//! receives the introspector itself, so it can derive its schema from another
//! type's (for example "the module schema minus `test_modules`").
//!
//! Compound properties bound to other types reference their children through
//! [`ChildSchema::Deferred`], which is only evaluated through
//! [`SchemaIntrospector::child_schema`]. That keeps mutually-referencing types
//! from recursing while their schemas are being built; a builder that *eagerly*
//! asks for a schema that is still under construction gets an
//! [`ExtgenError::InvalidSchema`] instead of a stack overflow.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use super::{ChildSchema, PropertyList};
use crate::core::{ExtgenError, Result};
use crate::types::TypeResolver;

/// Lazily builds and caches property schemas per component type.
pub struct SchemaIntrospector {
    types: Arc<TypeResolver>,
    cache: DashMap<String, Arc<PropertyList>>,
    building: Mutex<HashSet<String>>,
}

impl SchemaIntrospector {
    /// Create an introspector over a type resolver.
    pub fn new(types: Arc<TypeResolver>) -> Self {
        Self {
            types,
            cache: DashMap::new(),
            building: Mutex::new(HashSet::new()),
        }
    }

    /// The type resolver schemas are looked up through.
    pub fn types(&self) -> &TypeResolver {
        &self.types
    }

    /// Shared handle to the type resolver.
    pub fn types_handle(&self) -> Arc<TypeResolver> {
        Arc::clone(&self.types)
    }

    /// The validated property schema of a component type.
    pub fn property_schema(&self, component_type: &str) -> Result<Arc<PropertyList>> {
        let concrete = self.types.resolve(component_type);
        if let Some(schema) = self.cache.get(&concrete) {
            return Ok(Arc::clone(schema.value()));
        }

        let kind = self.types.kind_for(component_type)?;

        if !self.mark_building(&concrete) {
            return Err(ExtgenError::InvalidSchema {
                component_type: concrete,
                reason: "schema depends on itself; reference the type through a deferred child schema"
                    .to_string(),
            });
        }
        let built = (kind.schema)(self);
        self.unmark_building(&concrete);

        let schema = built?;
        schema.validate(&concrete)?;
        tracing::trace!("Built schema for {} ({} properties)", concrete, schema.len());

        let schema = Arc::new(schema);
        self.cache.insert(concrete, Arc::clone(&schema));
        Ok(schema)
    }

    /// Evaluate the children of a compound property.
    pub fn child_schema(&self, child: &ChildSchema) -> Result<Arc<PropertyList>> {
        match child {
            ChildSchema::Inline(list) => Ok(Arc::clone(list)),
            ChildSchema::Deferred {
                component_type,
                removed,
            } => {
                let base = self.property_schema(component_type)?;
                if removed.is_empty() {
                    Ok(base)
                } else {
                    Ok(Arc::new(base.without(removed)))
                }
            }
        }
    }

    /// Name of the primary property of a component type.
    pub fn primary_property(&self, component_type: &str) -> Result<String> {
        let schema = self.property_schema(component_type)?;
        schema.primary().map(|p| p.name.clone()).ok_or_else(|| ExtgenError::MissingPrimaryProperty {
            component_type: self.types.normalize(component_type),
        })
    }

    /// Number of cached schemas.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn mark_building(&self, concrete: &str) -> bool {
        match self.building.lock() {
            Ok(mut building) => building.insert(concrete.to_string()),
            Err(poisoned) => poisoned.into_inner().insert(concrete.to_string()),
        }
    }

    fn unmark_building(&self, concrete: &str) {
        match self.building.lock() {
            Ok(mut building) => building.remove(concrete),
            Err(poisoned) => poisoned.into_inner().remove(concrete),
        };
    }
}
