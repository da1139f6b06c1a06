//! Property definitions.
//!
//! A [`PropertyDefinition`] describes one property of a component's input
//! data. Its shape is a closed sum type, [`PropertyFormat`], so code that walks
//! a schema matches every shape exhaustively and each shape carries only the
//! fields that make sense for it: scalars and booleans cannot have children,
//! compounds always do, and a mutable property only knows its discriminator
//! and the variants it selects between.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::PropertyList;
use super::preset::PresetTable;
use crate::core::{ComponentData, Result};

/// Computes a default value from the data prepared so far.
pub type DefaultFn = dyn Fn(&ComponentData) -> Value + Send + Sync;

/// Property processing callback.
pub type ProcessFn = dyn Fn(&mut ProcessingContext<'_>) -> Result<()> + Send + Sync;

/// Everything a processing callback may read or change.
///
/// The processed value is lifted out of `data` while the callback runs (its
/// slot holds `null`) and written back afterwards, so the callback can edit
/// sibling properties and its own value at the same time.
pub struct ProcessingContext<'a> {
    /// The property's value
    pub value: &'a mut Value,
    /// The sibling data of the property
    pub data: &'a mut ComponentData,
    /// The property name
    pub property_name: &'a str,
    /// The property's own definition, which the callback may adjust
    pub definition: &'a mut PropertyDefinition,
}

/// Where the children of a compound property come from.
#[derive(Debug, Clone)]
pub enum ChildSchema {
    /// Children declared in place.
    Inline(Arc<PropertyList>),
    /// Children taken from another component type's schema, evaluated only
    /// when needed. `removed` lists properties dropped for this use, which is
    /// how mutually-referencing types break their cycle.
    Deferred {
        /// Component type whose schema supplies the children
        component_type: String,
        /// Properties removed from that schema
        removed: Vec<String>,
    },
}

impl ChildSchema {
    /// Deferred reference to a component type's full schema.
    pub fn deferred(component_type: impl Into<String>) -> Self {
        Self::Deferred {
            component_type: component_type.into(),
            removed: Vec::new(),
        }
    }
}

/// The structural shape of a property.
#[derive(Debug, Clone)]
pub enum PropertyFormat {
    /// A single string or number.
    Scalar,
    /// A flag. Counts as populated once set, even when `false`.
    Boolean,
    /// An ordered list of scalars.
    List,
    /// An ordered list of mappings, each shaped by the child schema.
    Compound(ChildSchema),
    /// A mapping whose shape is picked by its discriminator key.
    Mutable {
        /// Key inside the value that selects the variant
        discriminator: String,
        /// Variant key to the properties of that variant
        variants: IndexMap<String, Arc<PropertyList>>,
    },
}

impl PropertyFormat {
    /// Short name used in listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Compound(_) => "compound",
            Self::Mutable { .. } => "mutable",
        }
    }

    /// Whether values of this shape hold several items.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::List | Self::Compound(_))
    }
}

/// Default value of a property.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value.
    Literal(Value),
    /// Computed from the data prepared so far.
    Callback(Arc<DefaultFn>),
}

impl DefaultValue {
    /// Produce the default for the given data.
    pub fn compute(&self, data: &ComponentData) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Callback(callback) => callback(data),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "Literal({value})"),
            Self::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

/// Processing callback wrapper.
#[derive(Clone)]
pub struct Processor(pub Arc<ProcessFn>);

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Processor(..)")
    }
}

/// Marks a property as acquired from the requester.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acquisition {
    /// Requester property to read. `None` means "look up by name, then by
    /// the requester's reverse aliases".
    pub from: Option<String>,
}

/// One property of a component schema.
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    /// Machine name, the key in component data
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Optional description
    pub description: Option<String>,
    /// Structural shape
    pub format: PropertyFormat,
    /// Component type spawned for each value of this property, if any
    pub component_type: Option<String>,
    /// Must hold a value after preparation
    pub required: bool,
    /// The single identifying property of its type
    pub primary: bool,
    /// Default value or default callback
    pub default: Option<DefaultValue>,
    /// Apply the default during preparation
    pub process_default: bool,
    /// Always derived by the generator rather than supplied by users
    pub computed: bool,
    /// Not exposed to users at all
    pub internal: bool,
    /// Processing callback
    pub processing: Option<Processor>,
    /// Run the processing callback even when the value is empty
    pub process_empty: bool,
    /// Presets selectable through this property's value
    pub presets: Option<Arc<PresetTable>>,
    /// Value comes from the requester
    pub acquired: Option<Acquisition>,
    /// Name under which children may acquire this property
    pub acquired_alias: Option<String>,
    /// Allowed scalar values, informational
    pub options: Option<Vec<String>>,
}

impl PropertyDefinition {
    fn with_format(name: impl Into<String>, format: PropertyFormat) -> Self {
        let name = name.into();
        let label = default_label(&name);
        Self {
            name,
            label,
            description: None,
            format,
            component_type: None,
            required: false,
            primary: false,
            default: None,
            process_default: false,
            computed: false,
            internal: false,
            processing: None,
            process_empty: false,
            presets: None,
            acquired: None,
            acquired_alias: None,
            options: None,
        }
    }

    /// A scalar property.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::with_format(name, PropertyFormat::Scalar)
    }

    /// A boolean property.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::with_format(name, PropertyFormat::Boolean)
    }

    /// A list of scalars.
    pub fn list(name: impl Into<String>) -> Self {
        Self::with_format(name, PropertyFormat::List)
    }

    /// A list of mappings with inline children.
    pub fn compound(name: impl Into<String>, children: PropertyList) -> Self {
        Self::with_format(name, PropertyFormat::Compound(ChildSchema::Inline(Arc::new(children))))
    }

    /// A mapping whose variant is chosen by `discriminator`.
    pub fn mutable(
        name: impl Into<String>,
        discriminator: impl Into<String>,
        variants: impl IntoIterator<Item = (String, PropertyList)>,
    ) -> Self {
        Self::with_format(
            name,
            PropertyFormat::Mutable {
                discriminator: discriminator.into(),
                variants: variants.into_iter().map(|(key, list)| (key, Arc::new(list))).collect(),
            },
        )
    }

    /// A flag whose presence spawns one component of `component_type`.
    pub fn component_flag(name: impl Into<String>, component_type: impl Into<String>) -> Self {
        let mut property = Self::boolean(name);
        property.component_type = Some(component_type.into());
        property
    }

    /// A list of scalars, each spawning one component of `component_type`
    /// with the scalar as its primary property.
    pub fn component_list(name: impl Into<String>, component_type: impl Into<String>) -> Self {
        let mut property = Self::list(name);
        property.component_type = Some(component_type.into());
        property
    }

    /// A list of mappings, each spawning one component of `component_type`.
    pub fn component_compound(
        name: impl Into<String>,
        component_type: impl Into<String>,
    ) -> Self {
        let component_type = component_type.into();
        let mut property =
            Self::with_format(name, PropertyFormat::Compound(ChildSchema::deferred(&component_type)));
        property.component_type = Some(component_type);
        property
    }

    /// Set the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as the type's primary property.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Fixed default value, applied only with [`process_default`](Self::process_default),
    /// [`computed`](Self::computed) or [`internal`](Self::internal).
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Default computed from the data prepared so far.
    pub fn default_with(
        mut self,
        callback: impl Fn(&ComponentData) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.default = Some(DefaultValue::Callback(Arc::new(callback)));
        self
    }

    /// Apply the default during preparation.
    pub fn process_default(mut self) -> Self {
        self.process_default = true;
        self
    }

    /// Mark as computed: always defaulted, never user-facing.
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Mark as internal.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Attach a processing callback.
    pub fn processing(
        mut self,
        callback: impl Fn(&mut ProcessingContext<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.processing = Some(Processor(Arc::new(callback)));
        self
    }

    /// Run processing even on empty values.
    pub fn process_empty(mut self) -> Self {
        self.process_empty = true;
        self
    }

    /// Attach a preset table.
    pub fn presets(mut self, presets: PresetTable) -> Self {
        self.options = Some(presets.keys().cloned().collect());
        self.presets = Some(Arc::new(presets));
        self
    }

    /// Acquire from the requester, by name or reverse alias.
    pub fn acquired(mut self) -> Self {
        self.acquired = Some(Acquisition::default());
        self
    }

    /// Acquire from a named requester property.
    pub fn acquired_from(mut self, source: impl Into<String>) -> Self {
        self.acquired = Some(Acquisition {
            from: Some(source.into()),
        });
        self
    }

    /// Expose this property to acquiring children under another name.
    pub fn acquired_alias(mut self, alias: impl Into<String>) -> Self {
        self.acquired_alias = Some(alias.into());
        self
    }

    /// Restrict to a set of values.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the default is applied when the property is empty.
    pub fn applies_default(&self) -> bool {
        self.process_default || self.computed || self.internal
    }

    /// Whether values of this property spawn sub-components.
    pub fn is_component(&self) -> bool {
        self.component_type.is_some()
    }
}

/// "root_name" becomes "Root name".
fn default_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
