use std::collections::HashMap;

use tracing::debug;
use trimerge_types::{Path, Value};

use crate::error::{MergeError, MergeResult};
use crate::handler::{ConflictHandler, MergeContext};
use crate::ordering::merge_ordered_sets;
use crate::report::{Conflict, Favor};

/// Default name of the field that identifies mapping items.
pub const DEFAULT_IDENTITY_FIELD: &str = "id";

/// Merges sequences as ordered sets of identity-keyed items.
///
/// A mapping item is identified by the value of its identity field; any
/// other item is its own identity. Items are then reconciled per identity:
///
/// - deleted on one side and untouched on the other: dropped
/// - deleted on one side and modified on the other: the modification wins
/// - present everywhere: merged recursively at `path.<identity>`
/// - added on one side: kept
/// - added on both sides: merged recursively against an empty mapping
///
/// Survivors follow the update branch's order, with head-only items placed
/// by [`merge_ordered_sets`].
#[derive(Clone, Debug)]
pub struct IdentitySetMerger {
    identity_field: String,
}

impl Default for IdentitySetMerger {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_FIELD)
    }
}

/// Outcome of reconciling one identity.
enum Reconciled {
    Keep(Value),
    Tombstone,
}

/// Items of one sequence, keyed by identity, in first-seen order.
struct ItemIndex<'a> {
    order: Vec<&'a Value>,
    items: HashMap<&'a Value, &'a Value>,
}

impl<'a> ItemIndex<'a> {
    fn get(&self, identity: &Value) -> Option<&'a Value> {
        self.items.get(identity).copied()
    }
}

impl IdentitySetMerger {
    pub fn new(identity_field: impl Into<String>) -> Self {
        Self {
            identity_field: identity_field.into(),
        }
    }

    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    fn identity_of<'a>(&self, path: &Path, item: &'a Value) -> MergeResult<&'a Value> {
        match item {
            Value::Mapping(m) => m
                .get(&self.identity_field)
                .filter(|id| !id.is_absent())
                .ok_or_else(|| MergeError::IdentityFieldMissing {
                    path: path.clone(),
                    field: self.identity_field.clone(),
                    item: Box::new(item.clone()),
                }),
            Value::Absent => Err(MergeError::UnsupportedValue {
                path: path.clone(),
                reason: "absent item inside a sequence".into(),
            }),
            other => Ok(other),
        }
    }

    /// Index a sequence by identity. A repeated identity keeps its first
    /// position and its last value.
    fn index<'a>(&self, path: &Path, sequence: &'a Value) -> MergeResult<ItemIndex<'a>> {
        let items = sequence.as_sequence().unwrap_or_default();
        let mut index = ItemIndex {
            order: Vec::with_capacity(items.len()),
            items: HashMap::with_capacity(items.len()),
        };
        for item in items {
            let identity = self.identity_of(path, item)?;
            if index.items.insert(identity, item).is_none() {
                index.order.push(identity);
            }
        }
        Ok(index)
    }
}

impl ConflictHandler for IdentitySetMerger {
    fn name(&self) -> &str {
        "identity-set"
    }

    fn resolve(
        &self,
        ctx: &mut dyn MergeContext,
        path: &Path,
        root: &Value,
        head: &Value,
        update: &Value,
    ) -> MergeResult<Value> {
        let root_items = self.index(path, root)?;
        let head_items = self.index(path, head)?;
        let update_items = self.index(path, update)?;

        let mut reconciled: HashMap<&Value, Reconciled> = HashMap::new();

        for &identity in &root_items.order {
            let Some(root_item) = root_items.get(identity) else {
                continue;
            };
            let outcome = match (head_items.get(identity), update_items.get(identity)) {
                (None, None) => Reconciled::Tombstone,
                (None, Some(update_item)) => {
                    if update_item == root_item {
                        Reconciled::Tombstone
                    } else {
                        debug!(path = %path, identity = %identity, "head deleted an item update modified");
                        ctx.record_conflict(Conflict::modify_delete(path, identity, Favor::Update));
                        Reconciled::Keep(update_item.clone())
                    }
                }
                (Some(head_item), None) => {
                    if head_item == root_item {
                        Reconciled::Tombstone
                    } else {
                        debug!(path = %path, identity = %identity, "update deleted an item head modified");
                        ctx.record_conflict(Conflict::modify_delete(path, identity, Favor::Head));
                        Reconciled::Keep(head_item.clone())
                    }
                }
                (Some(head_item), Some(update_item)) => Reconciled::Keep(ctx.merge_at(
                    &path.identity_child(identity),
                    root_item,
                    head_item,
                    update_item,
                )?),
            };
            reconciled.insert(identity, outcome);
        }

        for &identity in &head_items.order {
            if reconciled.contains_key(identity) {
                continue;
            }
            let Some(head_item) = head_items.get(identity) else {
                continue;
            };
            let outcome = match update_items.get(identity) {
                // Added on both sides: merged against an empty mapping, so
                // non-mapping items added on both sides are a type conflict.
                Some(update_item) => Reconciled::Keep(ctx.merge_at(
                    &path.identity_child(identity),
                    &Value::empty_mapping(),
                    head_item,
                    update_item,
                )?),
                None => Reconciled::Keep(head_item.clone()),
            };
            reconciled.insert(identity, outcome);
        }

        for &identity in &update_items.order {
            if reconciled.contains_key(identity) {
                continue;
            }
            if let Some(update_item) = update_items.get(identity) {
                reconciled.insert(identity, Reconciled::Keep(update_item.clone()));
            }
        }

        let order = merge_ordered_sets(&head_items.order, &update_items.order);
        let mut merged = Vec::with_capacity(order.len());
        for identity in order {
            if let Some(Reconciled::Keep(item)) = reconciled.remove(identity) {
                if !item.is_absent() {
                    merged.push(item);
                }
            }
        }

        Ok(Value::Sequence(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::Merger;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn default_identity_field() {
        assert_eq!(IdentitySetMerger::default().identity_field(), "id");
        assert_eq!(IdentitySetMerger::new("key").identity_field(), "key");
    }

    #[test]
    fn custom_identity_field() {
        let merger = Merger::new().with_default_sequence_handler(IdentitySetMerger::new("key"));
        let root = v(json!([{"key": "a", "n": 1}]));
        let head = v(json!([{"key": "a", "n": 2}]));
        let update = v(json!([{"key": "a", "n": 1}, {"key": "b"}]));
        let merged = merger.merge(&root, &head, &update).unwrap();
        assert_eq!(merged, v(json!([{"key": "a", "n": 2}, {"key": "b"}])));
    }

    #[test]
    fn repeated_identity_keeps_first_position_and_last_value() {
        let root = v(json!([]));
        let head = v(json!([{"id": 1, "v": "a"}, {"id": 2}, {"id": 1, "v": "b"}]));
        let update = v(json!([{"id": 3}]));
        let merged = Merger::new().merge(&root, &head, &update).unwrap();
        assert_eq!(
            merged,
            v(json!([{"id": 3}, {"id": 1, "v": "b"}, {"id": 2}]))
        );
    }

    #[test]
    fn number_and_string_identities_differ() {
        let root = v(json!([]));
        let head = v(json!([{"id": 42, "from": "head"}]));
        let update = v(json!([{"id": "42", "from": "update"}]));
        let merged = Merger::new().merge(&root, &head, &update).unwrap();
        assert_eq!(
            merged,
            v(json!([{"id": "42", "from": "update"}, {"id": 42, "from": "head"}]))
        );
    }

    #[test]
    fn nested_sequences_as_items() {
        let root = v(json!([[1, 2]]));
        let head = v(json!([[1, 2], [3]]));
        let update = v(json!([[4], [1, 2]]));
        let merged = Merger::new().merge(&root, &head, &update).unwrap();
        assert_eq!(merged, v(json!([[4], [1, 2], [3]])));
    }

    #[test]
    fn both_delete_same_item() {
        let root = v(json!(["a", "b", "c"]));
        let head = v(json!(["a", "c"]));
        let update = v(json!(["c", "a"]));
        let merged = Merger::new().merge(&root, &head, &update).unwrap();
        assert_eq!(merged, v(json!(["c", "a"])));
    }

    #[test]
    fn update_modified_item_head_deleted() {
        let root = v(json!([{"id": "x", "n": 1}]));
        let head = v(json!([]));
        let update = v(json!([{"id": "x", "n": 5}]));
        let outcome = Merger::new().merge_with_report(&root, &head, &update).unwrap();
        assert_eq!(outcome.value, v(json!([{"id": "x", "n": 5}])));
        assert_eq!(outcome.conflicts[0].resolved_to, Favor::Update);
    }

    #[test]
    fn identity_field_holding_mapping() {
        let root = v(json!([]));
        let head = v(json!([{"id": {"ns": "a", "n": 1}, "v": 1}]));
        let update = v(json!([{"id": {"ns": "a", "n": 1}, "w": 2}]));
        let merged = Merger::new().merge(&root, &head, &update).unwrap();
        assert_eq!(
            merged,
            v(json!([{"id": {"ns": "a", "n": 1}, "v": 1, "w": 2}]))
        );
    }
}
