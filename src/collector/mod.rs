//! The component collector: recursive expansion of specification data.
//!
//! Starting from the root data, [`ComponentCollector::expand`] does the
//! following for every data subtree:
//!
//! 1. read the declared type and fetch its schema
//! 2. prepare the data against the schema, acquiring from the requester
//! 3. build a component instance
//! 4. look for a registered duplicate (same merge tag under the same closest
//!    root and type, or a same-named, same-typed child left by an earlier
//!    expansion of the requester). A duplicate absorbs the new data; if it
//!    absorbed nothing the request becomes an alias and expansion stops there,
//!    otherwise the existing component is expanded again
//! 5. spawn the sub-components named by properties bound to component types
//! 6. spawn the sub-components the instance itself requires
//!
//! Expansion is guarded against runaway recursion by a depth limit and by an
//! active-expansion stack that detects a component requiring an identical copy
//! of itself.

use std::collections::HashSet;

use heck::ToSnakeCase;
use serde_json::{Value, json};

use crate::collection::{ComponentCollection, ComponentId};
use crate::component::Component;
use crate::constants::{
    DEFAULT_MAX_EXPANSION_DEPTH, REQUEST_PATH_SEPARATOR, ROOT_LOCAL_NAME, TYPE_KEY,
};
use crate::core::{
    ComponentData, ExtgenError, Result, declared_type, is_truthy, scalar_to_string, value_kind,
};
use crate::prepare::{DataPreparer, RequesterContext};
use crate::schema::{PropertyDefinition, PropertyFormat, PropertyList, SchemaIntrospector};

struct ActiveExpansion {
    component_type: String,
    fingerprint: String,
    path: String,
}

/// Expands specification data into a [`ComponentCollection`].
pub struct ComponentCollector<'a> {
    schemas: &'a SchemaIntrospector,
    collection: ComponentCollection,
    max_depth: usize,
    active: Vec<ActiveExpansion>,
}

impl<'a> ComponentCollector<'a> {
    /// Create a collector with an empty collection.
    pub fn new(schemas: &'a SchemaIntrospector) -> Self {
        Self {
            schemas,
            collection: ComponentCollection::new(),
            max_depth: DEFAULT_MAX_EXPANSION_DEPTH,
            active: Vec::new(),
        }
    }

    /// Limit the request depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand the root data and return the filled, still unlocked collection.
    pub fn collect(mut self, root: ComponentData) -> Result<ComponentCollection> {
        let root_id = self.expand(ROOT_LOCAL_NAME, root, None)?;
        tracing::info!(
            "Collected {} components under {} '{}'",
            self.collection.len(),
            self.collection.component_type(root_id),
            self.collection.request_path(root_id)
        );
        Ok(self.collection)
    }

    /// The collection built so far.
    pub fn collection(&self) -> &ComponentCollection {
        &self.collection
    }

    /// Give up the collector and keep the collection.
    pub fn into_collection(self) -> ComponentCollection {
        self.collection
    }

    /// Expand one data subtree requested under `local_name`.
    ///
    /// Returns the component that ends up representing the request: either a
    /// newly registered one or the existing component it was merged into.
    pub fn expand(
        &mut self,
        local_name: &str,
        data: ComponentData,
        requester: Option<ComponentId>,
    ) -> Result<ComponentId> {
        let depth = self.depth_of(requester);
        self.expand_at(local_name, data, requester, depth)
    }

    fn expand_at(
        &mut self,
        local_name: &str,
        data: ComponentData,
        requester: Option<ComponentId>,
        depth: usize,
    ) -> Result<ComponentId> {
        let path = self.path_for(local_name, requester);
        if depth > self.max_depth {
            return Err(ExtgenError::ExpansionDepthExceeded {
                limit: self.max_depth,
                path,
            });
        }

        let declared = declared_type(&data)
            .ok_or_else(|| ExtgenError::MissingType {
                local_name: path.clone(),
            })?
            .to_string();
        let kind = *self.schemas.types().kind_for(&declared)?;
        let component_type = self.schemas.types().normalize(&declared);
        let schema = self.schemas.property_schema(&declared)?;

        tracing::debug!("Expanding {} '{}' ({})", component_type, path, kind.name);
        let prepared = self.prepare(&component_type, &schema, data, requester)?;
        let instance = (kind.build)(prepared.clone());

        let id = match self.find_candidate(&component_type, local_name, instance.as_ref(), requester)? {
            Some(existing) => {
                let merged = self.collection.component_mut(existing).merge_incoming_data(&prepared);
                let changed = merged.map_err(|conflict| ExtgenError::MergeDataLoss {
                    path: self.collection.request_path(existing).to_string(),
                    property: conflict.property,
                    existing: conflict.existing.to_string(),
                    incoming: conflict.incoming.to_string(),
                })?;
                if let Some(requester) = requester {
                    self.collection.register_alias(local_name, existing, requester)?;
                }
                if !changed {
                    tracing::debug!(
                        "'{}' duplicates '{}', nothing new to merge",
                        path,
                        self.collection.request_path(existing)
                    );
                    return Ok(existing);
                }
                tracing::debug!(
                    "Merged '{}' into '{}', expanding again",
                    path,
                    self.collection.request_path(existing)
                );
                existing
            }
            None => {
                self.collection
                    .register_resolved(local_name, &component_type, kind.name, instance, requester)?
            }
        };

        self.enter(id, &component_type)?;
        let result = self.expand_children(id, &schema, depth);
        self.active.pop();
        result?;

        Ok(id)
    }

    fn prepare(
        &self,
        component_type: &str,
        schema: &PropertyList,
        data: ComponentData,
        requester: Option<ComponentId>,
    ) -> Result<ComponentData> {
        let preparer = DataPreparer::new(self.schemas);
        match requester {
            Some(requester) => {
                let requester_schema =
                    self.schemas.property_schema(self.collection.component_type(requester))?;
                let context = RequesterContext {
                    data: self.collection.component(requester).data(),
                    schema: &requester_schema,
                };
                preparer.prepare(component_type, schema, data, Some(context))
            }
            None => preparer.prepare(component_type, schema, data, None),
        }
    }

    fn find_candidate(
        &self,
        component_type: &str,
        local_name: &str,
        instance: &dyn Component,
        requester: Option<ComponentId>,
    ) -> Result<Option<ComponentId>> {
        if let Some(existing) =
            self.collection.find_merge_candidate(component_type, instance, requester)?
        {
            return Ok(Some(existing));
        }
        // A merged component being expanded again re-requests its children.
        Ok(requester
            .and_then(|requester| self.collection.local_child(requester, local_name))
            .filter(|existing| self.collection.component_type(*existing) == component_type))
    }

    fn enter(&mut self, id: ComponentId, component_type: &str) -> Result<()> {
        let fingerprint =
            serde_json::to_string(self.collection.component(id).data()).unwrap_or_default();
        let path = self.collection.request_path(id).to_string();

        if let Some(start) = self
            .active
            .iter()
            .position(|a| a.component_type == component_type && a.fingerprint == fingerprint)
        {
            let mut chain: Vec<&str> = self.active[start..].iter().map(|a| a.path.as_str()).collect();
            chain.push(&path);
            return Err(ExtgenError::CyclicExpansion {
                chain: chain.join(" -> "),
            });
        }

        self.active.push(ActiveExpansion {
            component_type: component_type.to_string(),
            fingerprint,
            path,
        });
        Ok(())
    }

    fn expand_children(&mut self, id: ComponentId, schema: &PropertyList, depth: usize) -> Result<()> {
        let data = self.collection.component(id).data().clone();
        let mut used: HashSet<String> = HashSet::new();

        let mut requests = Vec::new();
        for property in schema {
            self.bound_requests(property, &data, &mut requests)?;
        }
        for (local_name, child) in requests {
            self.claim(id, &mut used, &local_name)?;
            self.expand_at(&local_name, child, Some(id), depth + 1)?;
        }

        let required = self.collection.component(id).required_components()?;
        for (local_name, child) in required {
            self.claim(id, &mut used, &local_name)?;
            self.expand_at(&local_name, child, Some(id), depth + 1)?;
        }

        Ok(())
    }

    /// Requests spawned by one component-bound property.
    fn bound_requests(
        &self,
        property: &PropertyDefinition,
        data: &ComponentData,
        requests: &mut Vec<(String, ComponentData)>,
    ) -> Result<()> {
        let Some(bound) = &property.component_type else {
            return Ok(());
        };
        let Some(value) = data.get(&property.name).filter(|v| !v.is_null()) else {
            return Ok(());
        };
        let typed = |mut child: ComponentData| {
            child.entry(TYPE_KEY.to_string()).or_insert_with(|| json!(bound));
            child
        };

        match &property.format {
            PropertyFormat::Boolean => {
                if is_truthy(value) {
                    requests.push((bound.to_snake_case(), typed(ComponentData::new())));
                }
            }
            PropertyFormat::Scalar | PropertyFormat::List => {
                let values = match value {
                    Value::Array(values) => values.clone(),
                    other => vec![other.clone()],
                };
                if values.is_empty() {
                    return Ok(());
                }
                let primary = self.schemas.primary_property(bound)?;
                for value in values {
                    let Some(local_name) = scalar_to_string(&value) else {
                        return Err(ExtgenError::InvalidComponentData {
                            local_name: format!("{}[{}]", property.name, bound),
                            found: value_kind(&value).to_string(),
                        });
                    };
                    let mut child = ComponentData::new();
                    child.insert(primary.clone(), value);
                    requests.push((local_name, typed(child)));
                }
            }
            PropertyFormat::Compound(_) => {
                let Value::Array(items) = value else {
                    return Err(ExtgenError::InvalidComponentData {
                        local_name: property.name.clone(),
                        found: value_kind(value).to_string(),
                    });
                };
                let prefix = bound.to_snake_case();
                for (index, item) in items.iter().enumerate() {
                    let Value::Object(item) = item else {
                        return Err(ExtgenError::InvalidComponentData {
                            local_name: format!("{}_{index}", prefix),
                            found: value_kind(item).to_string(),
                        });
                    };
                    requests.push((format!("{prefix}_{index}"), typed(item.clone())));
                }
            }
            // Rejected by schema validation.
            PropertyFormat::Mutable { .. } => {}
        }

        Ok(())
    }

    fn claim(&self, id: ComponentId, used: &mut HashSet<String>, local_name: &str) -> Result<()> {
        if used.insert(local_name.to_string()) {
            Ok(())
        } else {
            Err(ExtgenError::DuplicateLocalName {
                requester: self.collection.request_path(id).to_string(),
                local_name: local_name.to_string(),
            })
        }
    }

    fn path_for(&self, local_name: &str, requester: Option<ComponentId>) -> String {
        match requester {
            Some(requester) => format!(
                "{}{}{}",
                self.collection.request_path(requester),
                REQUEST_PATH_SEPARATOR,
                local_name
            ),
            None => local_name.to_string(),
        }
    }

    fn depth_of(&self, requester: Option<ComponentId>) -> usize {
        let mut depth = 0;
        let mut current = requester;
        while let Some(id) = current {
            depth += 1;
            current = self.collection.requester(id);
        }
        depth
    }
}

#[cfg(test)]
mod tests;
