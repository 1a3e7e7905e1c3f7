//! Diff-patch merge of a structural change onto existing YAML text
//!
//! [`merge`] takes the previous text, the value that text parses to and a
//! new value, and produces text for the new value that keeps every
//! unchanged subtree byte for byte: comments, key order, quoting and
//! blank lines survive. Changed leaves are re-rendered with `serde_yaml`;
//! new keys are appended to their mapping in the new value's order.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::tree::{
    self, MapEntry, MappingBlock, SequenceBlock, SequenceItem, indent_of, is_trivia,
};

/// Merge `new_value` into `old_text`, which must parse to `old_value`.
///
/// Returns `old_text` unchanged when the two values are equal.
pub fn merge(old_text: &str, old_value: &Value, new_value: &Value) -> Result<String> {
    if old_value == new_value {
        return Ok(old_text.to_string());
    }

    let lines: Vec<String> = old_text.lines().map(String::from).collect();
    let header_len = lines.iter().take_while(|line| is_trivia(line)).count();
    let (header, body) = lines.split_at(header_len);

    let empty = Map::new();
    let old_map = match old_value {
        Value::Object(map) => Some(map),
        Value::Null if body.is_empty() => Some(&empty),
        _ => None,
    };

    let merged_body = match (old_map, new_value) {
        (Some(old_map), Value::Object(new_map)) if !new_map.is_empty() => {
            match tree::parse_mapping(body, 0).filter(|block| block.matches(old_map)) {
                Some(block) => merge_mapping(block, old_map, new_map)?,
                None => render_document(new_value)?,
            }
        }
        _ => render_document(new_value)?,
    };

    let mut out: Vec<String> = header.to_vec();
    out.extend(merged_body);
    Ok(join_lines(&out))
}

fn join_lines(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn merge_mapping(
    block: MappingBlock,
    old: &Map<String, Value>,
    new: &Map<String, Value>,
) -> Result<Vec<String>> {
    let indent = block.indent;
    let mut out = Vec::new();

    for entry in block.entries {
        // Dropped keys take their leading comments with them
        let Some(new_value) = new.get(&entry.key) else {
            continue;
        };
        let old_value = old.get(&entry.key).unwrap_or(&Value::Null);

        out.extend(entry.leading.iter().cloned());
        if old_value == new_value {
            out.extend(entry.lines().cloned());
        } else {
            out.extend(merge_entry(&entry, old_value, new_value, indent)?);
        }
    }

    for (key, value) in new {
        if !old.contains_key(key) {
            out.extend(render_entry(key, value, indent)?);
        }
    }

    out.extend(block.trailing);
    Ok(out)
}

fn merge_entry(entry: &MapEntry, old: &Value, new: &Value, indent: usize) -> Result<Vec<String>> {
    if entry.inline {
        return render_entry(&entry.key, new, indent);
    }

    match (old, new) {
        (Value::Object(old_map), Value::Object(new_map)) if !new_map.is_empty() => {
            let nested = tree::nested_mapping(&entry.body, indent).filter(|b| b.matches(old_map));
            if let Some(nested) = nested {
                let mut out = vec![entry.key_line.clone()];
                out.extend(merge_mapping(nested, old_map, new_map)?);
                return Ok(out);
            }
        }
        (Value::Array(old_items), Value::Array(new_items)) if !new_items.is_empty() => {
            let nested = tree::nested_sequence(&entry.body, indent)
                .filter(|seq| seq.items.len() == old_items.len());
            if let Some(nested) = nested {
                let mut out = vec![entry.key_line.clone()];
                out.extend(merge_sequence(nested, old_items, new_items)?);
                return Ok(out);
            }
        }
        _ => {}
    }

    render_entry(&entry.key, new, indent)
}

fn merge_sequence(block: SequenceBlock, old: &[Value], new: &[Value]) -> Result<Vec<String>> {
    let indent = block.indent;
    let mut out = Vec::new();

    for (index, new_item) in new.iter().enumerate() {
        match (block.items.get(index), old.get(index)) {
            (Some(item), Some(old_item)) => {
                out.extend(item.leading.iter().cloned());
                if old_item == new_item {
                    out.extend(item.lines.iter().cloned());
                } else {
                    out.extend(merge_item(item, old_item, new_item, indent)?);
                }
            }
            _ => out.extend(render_item(new_item, indent)?),
        }
    }

    out.extend(block.trailing);
    Ok(out)
}

fn merge_item(item: &SequenceItem, old: &Value, new: &Value, indent: usize) -> Result<Vec<String>> {
    let (Value::Object(old_map), Value::Object(new_map)) = (old, new) else {
        return render_item(new, indent);
    };
    if new_map.is_empty() {
        return render_item(new, indent);
    }
    let Some(block) = tree::item_mapping(item, indent).filter(|b| b.matches(old_map)) else {
        return render_item(new, indent);
    };

    let content_indent = block.indent;
    let mut merged = merge_mapping(block, old_map, new_map)?;
    match merged.first() {
        Some(first) if !is_trivia(first) && indent_of(first) == content_indent => {
            let dash = format!(
                "{}-{}",
                " ".repeat(indent),
                " ".repeat(content_indent - indent - 1)
            );
            merged[0] = format!("{dash}{}", &first[content_indent..]);
            Ok(merged)
        }
        _ => render_item(new, indent),
    }
}

/// Render `key: value` as block YAML at `indent`.
pub fn render_entry(key: &str, value: &Value, indent: usize) -> Result<Vec<String>> {
    let mut single = Map::new();
    single.insert(key.to_string(), value.clone());
    Ok(indent_lines(&to_yaml(&Value::Object(single))?, indent))
}

/// Render `- value` as block YAML at `indent`.
fn render_item(value: &Value, indent: usize) -> Result<Vec<String>> {
    Ok(indent_lines(
        &to_yaml(&Value::Array(vec![value.clone()]))?,
        indent,
    ))
}

fn render_document(value: &Value) -> Result<Vec<String>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(indent_lines(&to_yaml(value)?, 0))
}

fn to_yaml(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::render(e.to_string()))
}

fn indent_lines(text: &str, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect()
}
