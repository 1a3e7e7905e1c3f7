//! Line-oriented view of block-style YAML
//!
//! Splits a document into mappings and sequences by indentation so the
//! merge can reuse the original lines of every untouched entry. Anything
//! the tree cannot represent faithfully (anchors, aliases, merge keys,
//! flow collections at a block position) makes parsing return `None`, and
//! the caller re-renders that subtree instead.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// A mapping key at the start of a line: quoted or plain, then `:` and an
/// optional inline remainder.
static KEY_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<key>"(?:[^"\\]|\\.)*"|'(?:[^']|'')*'|[^\s\-?:,\[\]{}#&*!|>'"%@`][^#]*?|-[^\s#][^#]*?)\s*:(?:\s+(?P<rest>.*))?$"#,
    )
    .expect("Invalid key line regex")
});

/// Number of leading spaces.
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Blank lines and comment lines carry no data.
pub(crate) fn is_trivia(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// `- item` (or a bare `-`) at exactly `indent`.
pub(crate) fn is_sequence_item(line: &str, indent: usize) -> bool {
    if indent_of(line) != indent {
        return false;
    }
    let content = &line[indent..];
    content == "-" || content.starts_with("- ")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeyLine {
    pub key: String,
    /// The value starts on the key line (scalar, flow collection or block scalar header).
    pub inline: bool,
    /// `|` / `>` header: every deeper line that follows is scalar text.
    pub block_scalar: bool,
}

/// Parse `key: rest` at exactly `indent`.
pub(crate) fn parse_key_line(line: &str, indent: usize) -> Option<KeyLine> {
    if indent_of(line) != indent {
        return None;
    }
    let content = line[indent..].trim_end();
    let caps = KEY_LINE_PATTERN.captures(content)?;
    let raw_key = caps.name("key")?.as_str().trim_end();
    if raw_key == "<<" {
        return None;
    }

    let key = if raw_key.starts_with('"') || raw_key.starts_with('\'') {
        serde_yaml::from_str::<String>(raw_key).ok()?
    } else {
        raw_key.to_string()
    };

    let rest = caps.name("rest").map(|m| m.as_str().trim()).unwrap_or("");
    let inline = !rest.is_empty() && !rest.starts_with('#');
    if rest.starts_with('&') || rest.starts_with('*') || rest.starts_with('!') {
        return None;
    }
    let block_scalar = rest.starts_with('|') || rest.starts_with('>');

    Some(KeyLine {
        key,
        inline,
        block_scalar,
    })
}

/// One `key: ...` entry of a block mapping.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MapEntry {
    pub key: String,
    /// Comments and blank lines directly above the key.
    pub leading: Vec<String>,
    pub key_line: String,
    pub inline: bool,
    /// Lines after the key line that belong to this entry.
    pub body: Vec<String>,
}

impl MapEntry {
    pub fn lines(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.key_line).chain(self.body.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MappingBlock {
    pub indent: usize,
    pub entries: Vec<MapEntry>,
    /// Comments and blank lines after the last entry.
    pub trailing: Vec<String>,
}

impl MappingBlock {
    /// The block holds exactly the keys of `value`, each once.
    pub fn matches(&self, value: &Map<String, Value>) -> bool {
        let mut seen = HashSet::new();
        self.entries.len() == value.len()
            && self
                .entries
                .iter()
                .all(|entry| value.contains_key(&entry.key) && seen.insert(entry.key.as_str()))
    }
}

/// One `- ...` item of a block sequence.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SequenceItem {
    pub leading: Vec<String>,
    /// First line starts with `-` at the sequence indent.
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SequenceBlock {
    pub indent: usize,
    pub items: Vec<SequenceItem>,
    pub trailing: Vec<String>,
}

/// Parse lines as a block mapping whose keys sit at `indent`.
pub(crate) fn parse_mapping(lines: &[String], indent: usize) -> Option<MappingBlock> {
    let mut entries: Vec<MapEntry> = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut in_block_scalar = false;

    for line in lines {
        if in_block_scalar && (line.trim().is_empty() || indent_of(line) > indent) {
            entries.last_mut()?.body.push(line.clone());
            continue;
        }
        in_block_scalar = false;

        if is_trivia(line) {
            pending.push(line.clone());
            continue;
        }

        let line_indent = indent_of(line);
        if line_indent == indent {
            if let Some(key_line) = parse_key_line(line, indent) {
                in_block_scalar = key_line.block_scalar;
                entries.push(MapEntry {
                    key: key_line.key,
                    leading: std::mem::take(&mut pending),
                    key_line: line.clone(),
                    inline: key_line.inline,
                    body: Vec::new(),
                });
                continue;
            }
            // Indentless sequence under a bare key
            let last = entries.last_mut()?;
            if is_sequence_item(line, indent) && !last.inline {
                last.body.append(&mut pending);
                last.body.push(line.clone());
                continue;
            }
            return None;
        }

        if line_indent > indent {
            let last = entries.last_mut()?;
            last.body.append(&mut pending);
            last.body.push(line.clone());
            continue;
        }

        return None;
    }

    Some(MappingBlock {
        indent,
        entries,
        trailing: pending,
    })
}

/// Parse lines as a block sequence whose dashes sit at `indent`.
pub(crate) fn parse_sequence(lines: &[String], indent: usize) -> Option<SequenceBlock> {
    let mut items: Vec<SequenceItem> = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for line in lines {
        if is_trivia(line) {
            pending.push(line.clone());
            continue;
        }
        if is_sequence_item(line, indent) {
            items.push(SequenceItem {
                leading: std::mem::take(&mut pending),
                lines: vec![line.clone()],
            });
            continue;
        }
        if indent_of(line) > indent {
            let last = items.last_mut()?;
            last.lines.append(&mut pending);
            last.lines.push(line.clone());
            continue;
        }
        return None;
    }

    Some(SequenceBlock {
        indent,
        items,
        trailing: pending,
    })
}

/// First line that carries data.
fn first_content(lines: &[String]) -> Option<&String> {
    lines.iter().find(|line| !is_trivia(line))
}

/// Nested block mapping in the body of a bare `key:` entry at `parent_indent`.
pub(crate) fn nested_mapping(body: &[String], parent_indent: usize) -> Option<MappingBlock> {
    let first = first_content(body)?;
    let indent = indent_of(first);
    if indent <= parent_indent || is_sequence_item(first, indent) {
        return None;
    }
    parse_mapping(body, indent)
}

/// Nested block sequence in the body of a bare `key:` entry at `parent_indent`.
pub(crate) fn nested_sequence(body: &[String], parent_indent: usize) -> Option<SequenceBlock> {
    let first = first_content(body)?;
    let indent = indent_of(first);
    if indent < parent_indent || !is_sequence_item(first, indent) {
        return None;
    }
    parse_sequence(body, indent)
}

/// A sequence item of the form `- key: value` viewed as a block mapping.
///
/// Returns the mapping and the indent of its keys; the dash is replaced
/// by spaces in the first line so the keys line up.
pub(crate) fn item_mapping(item: &SequenceItem, sequence_indent: usize) -> Option<MappingBlock> {
    let first = item.lines.first()?;
    let after_dash = first.get(sequence_indent + 1..)?;
    let gap = after_dash.len() - after_dash.trim_start_matches(' ').len();
    let rest = &after_dash[gap..];
    if gap == 0 || rest.is_empty() {
        return None;
    }
    let content_indent = sequence_indent + 1 + gap;

    let mut virtual_lines = Vec::with_capacity(item.lines.len());
    virtual_lines.push(format!("{}{}", " ".repeat(content_indent), rest));
    virtual_lines.extend(item.lines[1..].iter().cloned());

    let block = parse_mapping(&virtual_lines, content_indent)?;
    // A leading comment inside the item cannot be re-attached to the dash
    if block.entries.first().is_some_and(|e| !e.leading.is_empty()) {
        return None;
    }
    Some(block)
}
