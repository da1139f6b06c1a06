//! Declarative property schemas.
//!
//! Every component type describes its input data with a [`PropertyList`]: an
//! ordered list of [`PropertyDefinition`]s. Declaration order is significant,
//! because the data preparer walks properties in that order and a preset can
//! only influence properties that are prepared after it.
//!
//! Schemas are produced lazily by the [`SchemaIntrospector`], memoized per
//! component type, and validated once when first built.

pub mod introspector;
pub mod preset;
pub mod property;

pub use introspector::SchemaIntrospector;
pub use preset::{Preset, PresetData, PresetEntry, PresetTable, presets_from_yaml};
pub use property::{
    Acquisition, ChildSchema, DefaultValue, ProcessingContext, Processor, PropertyDefinition,
    PropertyFormat,
};

use std::collections::HashSet;

use crate::core::{ExtgenError, Result};

/// Ordered list of property definitions.
#[derive(Debug, Clone, Default)]
pub struct PropertyList {
    properties: Vec<PropertyDefinition>,
}

impl PropertyList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property.
    pub fn push(&mut self, property: PropertyDefinition) {
        self.properties.push(property);
    }

    /// Builder-style append.
    #[must_use]
    pub fn with(mut self, property: PropertyDefinition) -> Self {
        self.push(property);
        self
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether there are no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyDefinition> {
        self.properties.iter()
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropertyDefinition> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Property at a declaration index.
    pub fn at(&self, index: usize) -> Option<&PropertyDefinition> {
        self.properties.get(index)
    }

    /// Mutable property at a declaration index.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut PropertyDefinition> {
        self.properties.get_mut(index)
    }

    /// Declaration index of a property.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Whether a property is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The property flagged as primary, if any.
    pub fn primary(&self) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.primary)
    }

    /// The property exposing `alias` to acquiring children.
    pub fn by_acquired_alias(&self, alias: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.acquired_alias.as_deref() == Some(alias))
    }

    /// Copy of this list without the named properties.
    #[must_use]
    pub fn without<S: AsRef<str>>(&self, removed: &[S]) -> Self {
        Self {
            properties: self
                .properties
                .iter()
                .filter(|p| !removed.iter().any(|r| r.as_ref() == p.name))
                .cloned()
                .collect(),
        }
    }

    /// Replace a property in place, keeping its position.
    pub fn replace(&mut self, property: PropertyDefinition) -> bool {
        match self.get_mut(&property.name) {
            Some(slot) => {
                *slot = property;
                true
            }
            None => false,
        }
    }

    /// Validate structural rules for `component_type`'s schema.
    ///
    /// Rejects duplicate names, more than one primary property, mutable
    /// properties bound to component types, and presets that target unknown
    /// siblings or siblings declared before the preset property. Inline child
    /// lists and mutable variants are validated recursively.
    pub fn validate(&self, component_type: &str) -> Result<()> {
        let invalid = |reason: String| ExtgenError::InvalidSchema {
            component_type: component_type.to_string(),
            reason,
        };

        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(invalid(format!("property '{}' is declared twice", property.name)));
            }
        }

        if self.properties.iter().filter(|p| p.primary).count() > 1 {
            return Err(invalid("more than one primary property".to_string()));
        }

        for (index, property) in self.properties.iter().enumerate() {
            match &property.format {
                PropertyFormat::Mutable { variants, .. } => {
                    if property.is_component() {
                        return Err(invalid(format!(
                            "mutable property '{}' cannot be bound to a component type",
                            property.name
                        )));
                    }
                    for variant in variants.values() {
                        variant.validate(component_type)?;
                    }
                }
                PropertyFormat::Compound(ChildSchema::Inline(children)) => {
                    children.validate(component_type)?;
                }
                _ => {}
            }

            if let Some(presets) = &property.presets {
                for (key, preset) in presets.iter() {
                    for target in preset.targets() {
                        let reason = match self.position(target) {
                            None => Some("no such property"),
                            Some(position) if position <= index => {
                                Some("presets can only affect properties declared after them")
                            }
                            Some(_) => None,
                        };
                        if let Some(reason) = reason {
                            return Err(ExtgenError::InvalidPresetTarget {
                                property: property.name.clone(),
                                preset: key.clone(),
                                target: target.to_string(),
                                reason: reason.to_string(),
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<PropertyDefinition> for PropertyList {
    fn from_iter<T: IntoIterator<Item = PropertyDefinition>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertyList {
    type Item = &'a PropertyDefinition;
    type IntoIter = std::slice::Iter<'a, PropertyDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
