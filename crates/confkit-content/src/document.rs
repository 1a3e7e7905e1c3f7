//! YAML text paired with the value it parses to

use serde_json::Value;

use crate::diff::SemanticDiff;
use crate::error::{Error, Result};
use crate::merge::merge;
use crate::tree::is_trivia;

/// Parse YAML text into a JSON value, keeping mapping order.
///
/// A document with nothing but comments and blank lines is `null`.
pub fn parse_yaml(text: &str) -> Result<Value> {
    if text.lines().all(is_trivia) {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text).map_err(|e| Error::parse("YAML", e.to_string()))
}

/// Config text and its parsed value, always replaced together.
///
/// Keeping the pair in sync is what lets [`merge`] patch the text: the
/// merge needs to know which value the current text stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlDocument {
    text: String,
    value: Value,
}

impl YamlDocument {
    /// Parse `text` and keep it alongside its value.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let value = parse_yaml(&text)?;
        Ok(Self { text, value })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Structural changes between the current value and `new_value`.
    pub fn diff(&self, new_value: &Value) -> SemanticDiff {
        SemanticDiff::compute(&self.value, new_value)
    }

    /// Text this document would have after merging `new_value`.
    pub fn merged_text(&self, new_value: &Value) -> Result<String> {
        merge(&self.text, &self.value, new_value)
    }

    /// Swap in new text (e.g. after formatting), re-parsing its value.
    pub fn replace_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.value = parse_yaml(&text)?;
        self.text = text;
        Ok(())
    }
}
