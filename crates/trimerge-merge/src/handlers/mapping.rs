use std::collections::BTreeSet;

use trimerge_types::{Mapping, Path, Value};

use crate::error::MergeResult;
use crate::handler::{ConflictHandler, MergeContext};

/// Merges keyed mappings one key at a time.
///
/// Every key present on any side is merged recursively at `path.key`; a
/// missing side contributes `Absent`. Keys whose merged value is `Absent`
/// are left out of the result. An `Absent` mapping counts as empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct MappingMerger;

impl MappingMerger {
    pub fn new() -> Self {
        Self
    }
}

fn keys_of(value: &Value) -> impl Iterator<Item = &String> {
    value.as_mapping().into_iter().flat_map(Mapping::keys)
}

impl ConflictHandler for MappingMerger {
    fn name(&self) -> &str {
        "mapping"
    }

    fn resolve(
        &self,
        ctx: &mut dyn MergeContext,
        path: &Path,
        root: &Value,
        head: &Value,
        update: &Value,
    ) -> MergeResult<Value> {
        let keys: BTreeSet<&String> = keys_of(root)
            .chain(keys_of(head))
            .chain(keys_of(update))
            .collect();

        let mut merged = Mapping::new();
        for key in keys {
            let value = ctx.merge_at(
                &path.child(key.as_str()),
                root.get(key),
                head.get(key),
                update.get(key),
            )?;
            if !value.is_absent() {
                merged.insert(key.clone(), value);
            }
        }

        Ok(Value::Mapping(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::Merger;
    use serde_json::json;

    #[test]
    fn absent_mapping_counts_as_empty() {
        let head = Value::from(json!({"a": {"b": 1}}));
        let update = Value::from(json!({"c": 2}));
        let merged = Merger::new().merge(&Value::Absent, &head, &update).unwrap();
        assert_eq!(merged, Value::from(json!({"a": {"b": 1}, "c": 2})));
    }

    #[test]
    fn keys_come_out_sorted() {
        let root = Value::from(json!({"m": 0}));
        let head = Value::from(json!({"m": 0, "z": 1, "b": 1}));
        let update = Value::from(json!({"m": 0, "a": 1, "y": 1}));
        let merged = Merger::new().merge(&root, &head, &update).unwrap();
        let keys: Vec<&str> = merged
            .as_mapping()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["a", "b", "m", "y", "z"]);
    }

    #[test]
    fn both_sides_delete_everything() {
        let root = Value::from(json!({"a": 1, "b": 2}));
        let head = Value::from(json!({"b": 2}));
        let update = Value::from(json!({"a": 1}));
        let merged = Merger::new().merge(&root, &head, &update).unwrap();
        assert_eq!(merged, Value::empty_mapping());
    }

    #[test]
    fn name() {
        assert_eq!(MappingMerger::new().name(), "mapping");
    }
}
