//! Generic merging of component data.
//!
//! When two expansion requests resolve to the same merge tag, the component
//! that was registered first absorbs the data of the second. Merging is
//! monotonic: it may add values but never removes or replaces one that is
//! already present. Anything that would require replacing a value is a
//! [`MergeConflict`].

use serde_json::Value;

use crate::core::{ComponentData, is_empty_value};

/// Incoming data that cannot be merged without losing information.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConflict {
    /// Dotted path of the conflicting property
    pub property: String,
    /// Value already held
    pub existing: Value,
    /// Value that was offered
    pub incoming: Value,
}

/// Merge `incoming` into `existing`.
///
/// Returns `Ok(true)` when anything new was absorbed and `Ok(false)` when
/// `incoming` was already contained in `existing`.
///
/// - empty incoming values are ignored
/// - missing or empty existing values take the incoming value
/// - lists gain the incoming items they do not already contain
/// - mappings merge recursively
/// - differing scalars (or differing shapes) conflict
pub fn merge_data(
    existing: &mut ComponentData,
    incoming: &ComponentData,
) -> Result<bool, MergeConflict> {
    merge_map(existing, incoming, "")
}

fn merge_map(
    existing: &mut ComponentData,
    incoming: &ComponentData,
    prefix: &str,
) -> Result<bool, MergeConflict> {
    let mut changed = false;

    for (key, incoming_value) in incoming {
        if is_empty_value(incoming_value) {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if existing.get(key).is_none_or(is_empty_value) {
            existing.insert(key.clone(), incoming_value.clone());
            changed = true;
            continue;
        }
        let Some(slot) = existing.get_mut(key) else {
            continue;
        };

        if slot == incoming_value {
            continue;
        }

        match (slot, incoming_value) {
            (Value::Array(items), Value::Array(new_items)) => {
                for item in new_items {
                    if !items.contains(item) {
                        items.push(item.clone());
                        changed = true;
                    }
                }
            }
            (Value::Object(map), Value::Object(new_map)) => {
                changed |= merge_map(map, new_map, &path)?;
            }
            (slot, _) => {
                return Err(MergeConflict {
                    property: path,
                    existing: slot.clone(),
                    incoming: incoming_value.clone(),
                });
            }
        }
    }

    Ok(changed)
}
