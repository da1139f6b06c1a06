//! Preset tables.
//!
//! A preset is a named bundle of values for *other* properties, selected by
//! the value of the property that carries the table. Each preset has a
//! `force` table, whose entries overwrite the named siblings, and a `suggest`
//! table, whose entries only fill siblings that are still empty.
//!
//! Tables are plain serde data so component libraries can declare them in
//! YAML:
//!
//! ```yaml
//! block:
//!   label: Block
//!   data:
//!     force:
//!       plugin_subdir:
//!         value: Block
//!     suggest:
//!       interfaces:
//!         value: []
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single value a preset applies to a sibling property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetEntry {
    /// The value to apply
    pub value: Value,
}

impl PresetEntry {
    /// Wrap a value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// The forced and suggested values of one preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetData {
    /// Values that overwrite the named sibling unconditionally.
    #[serde(default)]
    pub force: IndexMap<String, PresetEntry>,
    /// Values that only populate a sibling that is still empty.
    #[serde(default)]
    pub suggest: IndexMap<String, PresetEntry>,
}

/// One selectable preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Human-readable label
    pub label: String,
    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Values applied when the preset is selected
    #[serde(default)]
    pub data: PresetData,
}

impl Preset {
    /// Create a preset with no values.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            data: PresetData::default(),
        }
    }

    /// Add a forced value.
    pub fn force(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.force.insert(property.into(), PresetEntry::new(value));
        self
    }

    /// Add a suggested value.
    pub fn suggest(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.suggest.insert(property.into(), PresetEntry::new(value));
        self
    }

    /// Every sibling property this preset writes to.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.data.force.keys().chain(self.data.suggest.keys()).map(String::as_str)
    }
}

/// Preset key to preset, in declaration order.
pub type PresetTable = IndexMap<String, Preset>;

/// Parse a preset table from YAML.
pub fn presets_from_yaml(yaml: &str) -> Result<PresetTable, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml_table() {
        let table = presets_from_yaml(
            r#"
large:
  label: Large
  data:
    force:
      max_items:
        value: 100
small:
  label: Small
  data:
    suggest:
      max_items:
        value: 5
"#,
        )
        .unwrap();

        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["large", "small"]);
        assert_eq!(table["large"].data.force["max_items"].value, json!(100));
        assert!(table["large"].data.suggest.is_empty());
        assert_eq!(table["small"].data.suggest["max_items"].value, json!(5));
    }

    #[test]
    fn test_builder_and_targets() {
        let preset = Preset::new("Block").force("plugin_subdir", "Block").suggest("interfaces", json!([]));
        let targets: Vec<_> = preset.targets().collect();
        assert_eq!(targets, vec!["plugin_subdir", "interfaces"]);
    }
}
