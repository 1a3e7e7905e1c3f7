//! The `project` schema chain.
//!
//! Version 0 keeps entries under `list`; version 1 renames it to `items`
//! and allows an optional `name`.

use serde_json::{Value, json};

pub const PROJECT: &str = "project";

pub const DESCRIPTION: &str = "Defines project settings";

pub fn project_v0() -> Value {
    json!({
        "type": "object",
        "properties": {
            "version": { "const": 0 },
            "list": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["version", "list"],
        "additionalProperties": false
    })
}

pub fn project_v1() -> Value {
    json!({
        "type": "object",
        "description": DESCRIPTION,
        "properties": {
            "version": { "const": 1 },
            "name": { "type": "string" },
            "items": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["version", "items"],
        "additionalProperties": false
    })
}

/// Schemas for versions 0 and 1.
pub fn project_schemas() -> Vec<Value> {
    vec![project_v0(), project_v1()]
}

/// Move the value under `from` to `to`, leaving other keys alone.
pub fn rename_key(mut value: Value, from: &str, to: &str) -> Value {
    if let Some(moved) = value.as_object_mut().and_then(|map| map.remove(from)) {
        value[to] = moved;
    }
    value
}
