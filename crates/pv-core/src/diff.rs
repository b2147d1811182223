//! Field-level diff engine.
//!
//! Compares two scalar snapshots and reports the fields whose values
//! differ. Only fields present in BOTH snapshots are considered - a field
//! missing from the new state is never inferred to be a deletion. Date
//! values reach this module already serialized as ISO-8601 strings, so
//! equality is plain JSON equality and diffs stored in the ledger compare
//! identically after a round-trip through the database.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One changed field. Serializes as `{"from": .., "to": ..}`, the shape
/// stored in `update` change records and consumed by replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: Value,
    pub to: Value,
}

/// Compute the field-level delta between two snapshots. An empty result
/// means a no-op: explicit update flows must not log anything for it.
pub fn diff_states(
    old_state: &Map<String, Value>,
    new_state: &Map<String, Value>,
) -> BTreeMap<String, FieldChange> {
    let mut changes = BTreeMap::new();

    for (field, new_value) in new_state {
        if let Some(old_value) = old_state.get(field)
            && old_value != new_value
        {
            changes.insert(
                field.clone(),
                FieldChange {
                    from: old_value.clone(),
                    to: new_value.clone(),
                },
            );
        }
    }

    changes
}

/// Render a diff as the JSON object stored in an `update` record's
/// `changes` payload.
pub fn changes_to_value(changes: &BTreeMap<String, FieldChange>) -> Value {
    let mut payload = Map::new();
    for (field, change) in changes {
        let mut entry = Map::new();
        entry.insert("from".to_string(), change.from.clone());
        entry.insert("to".to_string(), change.to.clone());
        payload.insert(field.clone(), Value::Object(entry));
    }
    Value::Object(payload)
}
