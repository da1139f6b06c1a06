//! Data preparation.
//!
//! The [`DataPreparer`] walks a property schema against a raw data subtree and
//! turns it into the prepared data a component is built from. Properties are
//! visited strictly in declaration order and each property goes through the
//! same steps, in this order:
//!
//! 1. **Acquisition**: copy the value from the requester (explicit source
//!    property, same-named property, or the requester's reverse alias)
//! 2. **Defaults**: fill unset properties flagged `process_default`,
//!    `computed` or `internal`; list and compound shapes default to `[]`
//! 3. **Presets**: expand the selected preset(s) into forced and suggested
//!    values of later siblings
//! 4. **Processing**: run the property's callback
//! 5. **Recursion**: prepare the items of compound properties and the
//!    selected variant of mutable properties
//!
//! Because presets run when their own property is visited, they can only
//! influence siblings that have not been visited yet. Schemas enforce this
//! by rejecting presets that target earlier siblings.
//!
//! Properties bound to a component type are left alone beyond acquisition
//! and presets: the spawned sub-component prepares its own data.

use std::collections::HashMap;

use serde_json::Value;

use crate::core::{
    ComponentData, ExtgenError, Result, declared_type, get_str, is_empty_value, is_populated, is_set,
    scalar_to_string,
};
use crate::schema::{
    ProcessingContext, Processor, PropertyDefinition, PropertyFormat, PropertyList,
    SchemaIntrospector,
};

/// The requesting component, as seen by acquisition.
#[derive(Debug, Clone, Copy)]
pub struct RequesterContext<'r> {
    /// Prepared data of the requester
    pub data: &'r ComponentData,
    /// Property schema of the requester
    pub schema: &'r PropertyList,
}

/// Prepares raw component data against property schemas.
pub struct DataPreparer<'a> {
    schemas: &'a SchemaIntrospector,
}

impl<'a> DataPreparer<'a> {
    /// Create a preparer resolving deferred child schemas through `schemas`.
    pub fn new(schemas: &'a SchemaIntrospector) -> Self {
        Self {
            schemas,
        }
    }

    /// Prepare `data` for a component of `component_type`.
    ///
    /// Keys that the schema does not declare are kept as they are.
    pub fn prepare(
        &self,
        component_type: &str,
        schema: &PropertyList,
        data: ComponentData,
        requester: Option<RequesterContext<'_>>,
    ) -> Result<ComponentData> {
        let mut data = data;
        self.prepare_in_place(component_type, schema, &mut data, requester)?;
        Ok(data)
    }

    /// Prepare `data` in place.
    pub fn prepare_in_place(
        &self,
        component_type: &str,
        schema: &PropertyList,
        data: &mut ComponentData,
        requester: Option<RequesterContext<'_>>,
    ) -> Result<()> {
        // Number of presets that forced each sibling so far.
        let mut forced: HashMap<String, usize> = HashMap::new();

        for property in schema {
            // Processing callbacks may adjust the definition for this run only.
            let mut property = property.clone();

            self.acquire(component_type, &property, data, requester)?;
            if !forced.contains_key(&property.name) {
                apply_default(&property, data);
            }
            apply_presets(component_type, schema, &property, data, &mut forced)?;
            process(&mut property, data)?;
            self.recurse(component_type, &property, data, requester)?;

            if property.required && !property.is_component() && !has_value(&property, data) {
                return Err(ExtgenError::MissingRequiredProperty {
                    component_type: component_type.to_string(),
                    property: property.name.clone(),
                });
            }
        }

        Ok(())
    }

    fn acquire(
        &self,
        component_type: &str,
        property: &PropertyDefinition,
        data: &mut ComponentData,
        requester: Option<RequesterContext<'_>>,
    ) -> Result<()> {
        let Some(acquisition) = &property.acquired else {
            return Ok(());
        };
        let Some(requester) = requester else {
            return Err(ExtgenError::AcquisitionWithoutRequester {
                component_type: component_type.to_string(),
                property: property.name.clone(),
            });
        };

        let found = match &acquisition.from {
            Some(source) => requester.data.get(source),
            None => {
                let same_name = requester
                    .schema
                    .contains(&property.name)
                    .then(|| requester.data.get(&property.name))
                    .flatten()
                    .filter(|value| !value.is_null());
                same_name.or_else(|| {
                    requester
                        .schema
                        .by_acquired_alias(&property.name)
                        .and_then(|aliased| requester.data.get(&aliased.name))
                })
            }
        };

        match found.filter(|value| !value.is_null()) {
            Some(value) => {
                tracing::trace!("Acquired {}.{} from requester", component_type, property.name);
                data.insert(property.name.clone(), value.clone());
                Ok(())
            }
            None => Err(ExtgenError::UnresolvedAcquisition {
                component_type: component_type.to_string(),
                property: property.name.clone(),
                requester_type: declared_type(requester.data).unwrap_or("unknown").to_string(),
            }),
        }
    }

    fn recurse(
        &self,
        component_type: &str,
        property: &PropertyDefinition,
        data: &mut ComponentData,
        requester: Option<RequesterContext<'_>>,
    ) -> Result<()> {
        if property.is_component() {
            return Ok(());
        }

        match &property.format {
            PropertyFormat::Compound(child) => {
                let Some(Value::Array(items)) = data.get_mut(&property.name) else {
                    return Ok(());
                };
                let children = self.schemas.child_schema(child)?;
                for item in items.iter_mut() {
                    if let Value::Object(item) = item {
                        self.prepare_in_place(component_type, &children, item, requester)?;
                    }
                }
            }
            PropertyFormat::Mutable {
                discriminator,
                variants,
            } => {
                let Some(Value::Object(value)) = data.get_mut(&property.name) else {
                    return Ok(());
                };
                let Some(variant) =
                    get_str(value, discriminator).and_then(|key| variants.get(key)).cloned()
                else {
                    return Ok(());
                };
                self.prepare_in_place(component_type, &variant, value, requester)?;
            }
            PropertyFormat::Scalar | PropertyFormat::Boolean | PropertyFormat::List => {}
        }

        Ok(())
    }
}

/// Whether the property counts as populated; booleans count once set.
fn has_value(property: &PropertyDefinition, data: &ComponentData) -> bool {
    match property.format {
        PropertyFormat::Boolean => is_set(data, &property.name),
        _ => is_populated(data, &property.name),
    }
}

fn apply_default(property: &PropertyDefinition, data: &mut ComponentData) {
    if property.is_component() || has_value(property, data) {
        return;
    }

    let value = property
        .applies_default()
        .then(|| property.default.as_ref().map(|default| default.compute(data)))
        .flatten()
        .or_else(|| property.format.is_multiple().then(|| Value::Array(Vec::new())));

    if let Some(value) = value {
        tracing::trace!("Defaulted {} to {}", property.name, value);
        data.insert(property.name.clone(), value);
    }
}

fn apply_presets(
    component_type: &str,
    schema: &PropertyList,
    property: &PropertyDefinition,
    data: &mut ComponentData,
    forced: &mut HashMap<String, usize>,
) -> Result<()> {
    let Some(presets) = &property.presets else {
        return Ok(());
    };

    let selected: Vec<String> = match data.get(&property.name) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(value) => scalar_to_string(value).into_iter().collect(),
        None => Vec::new(),
    };

    for key in selected {
        let preset = presets.get(&key).ok_or_else(|| ExtgenError::UnknownPreset {
            property: property.name.clone(),
            preset: key.clone(),
        })?;
        tracing::trace!("Applying preset {}={}", property.name, key);

        for (target, entry) in &preset.data.force {
            let target_property = sibling(component_type, schema, target)?;
            let count = forced.entry(target.clone()).or_insert(0);
            *count += 1;

            if *count == 1 {
                data.insert(target.clone(), entry.value.clone());
            } else if target_property.format.is_multiple() {
                union_into(data, target, &entry.value);
            } else {
                return Err(ExtgenError::IncompatiblePresetMultiplicity {
                    property: property.name.clone(),
                    target: target.clone(),
                });
            }
        }

        for (target, entry) in &preset.data.suggest {
            let target_property = sibling(component_type, schema, target)?;
            if !has_value(target_property, data) {
                data.insert(target.clone(), entry.value.clone());
            }
        }
    }

    Ok(())
}

fn sibling<'s>(
    component_type: &str,
    schema: &'s PropertyList,
    name: &str,
) -> Result<&'s PropertyDefinition> {
    schema.get(name).ok_or_else(|| ExtgenError::UnknownProperty {
        component_type: component_type.to_string(),
        property: name.to_string(),
    })
}

/// Append the items of `incoming` to the list held under `key`.
fn union_into(data: &mut ComponentData, key: &str, incoming: &Value) {
    let mut items = match data.remove(key) {
        Some(Value::Array(items)) => items,
        Some(value) if !is_empty_value(&value) => vec![value],
        _ => Vec::new(),
    };
    let incoming = match incoming {
        Value::Array(values) => values.clone(),
        value => vec![value.clone()],
    };
    for value in incoming {
        if !items.contains(&value) {
            items.push(value);
        }
    }
    data.insert(key.to_string(), Value::Array(items));
}

fn process(property: &mut PropertyDefinition, data: &mut ComponentData) -> Result<()> {
    let Some(Processor(callback)) = property.processing.clone() else {
        return Ok(());
    };
    let name = property.name.clone();
    if data.get(&name).is_none_or(is_empty_value) && !property.process_empty {
        return Ok(());
    }

    let existed = data.contains_key(&name);
    let mut value = data.get_mut(&name).map(Value::take).unwrap_or(Value::Null);
    let result = callback(&mut ProcessingContext {
        value: &mut value,
        data,
        property_name: &name,
        definition: property,
    });
    if existed || !value.is_null() {
        data.insert(name, value);
    }
    result
}
