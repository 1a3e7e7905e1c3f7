//! JSON schemas for every config version and the validators built from them
//!
//! A definition carries one schema per historical version. Files on disk
//! are first checked against the union of all of them (any known version
//! is acceptable before migration), then against the latest schema once
//! migrated.

use std::collections::HashSet;
use std::fmt;

use jsonschema::{ValidationError, Validator};
use serde_json::{Value, json};

use crate::{Error, Result};

/// Schemas for versions `0..=N`, plus the latest one used for editor
/// hints and post-migration validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSet {
    all: Vec<Value>,
    latest: Value,
}

impl SchemaSet {
    pub fn new(all: Vec<Value>, latest: Value) -> Self {
        Self { all, latest }
    }

    /// Schemas indexed by version.
    pub fn all(&self) -> &[Value] {
        &self.all
    }

    pub fn latest(&self) -> &Value {
        &self.latest
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Top-level `description` of the latest schema.
    pub fn description(&self) -> Option<&str> {
        self.latest.get("description").and_then(Value::as_str)
    }
}

/// Human-readable list of validation failures.
///
/// Displays as `Errors:` followed by one line per failure. Failures that
/// several schema alternatives report identically (same location, keyword
/// and message) appear once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    lines: Vec<String>,
}

impl ValidationReport {
    /// Report built from validator errors, dropping duplicates.
    pub fn from_errors<'a>(errors: impl IntoIterator<Item = ValidationError<'a>>) -> Self {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for error in errors {
            let location = error.instance_path.to_string();
            let message = error.to_string();
            let key = (location.clone(), format!("{:?}", error.kind), message.clone());
            if !seen.insert(key) {
                continue;
            }
            if location.is_empty() {
                lines.push(message);
            } else {
                lines.push(format!("{location}: {message}"));
            }
        }
        Self { lines }
    }

    /// Report with a single free-form line.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            lines: vec![message.into()],
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Errors:\n\n{}", self.lines.join("\n"))
    }
}

/// Compiled validators for one definition.
pub(crate) struct CompiledSchemas {
    any_version: Validator,
    versions: Vec<Validator>,
    latest: Validator,
}

impl CompiledSchemas {
    pub(crate) fn compile(name: &str, schemas: &SchemaSet) -> Result<Self> {
        let compile = |schema: &Value| {
            jsonschema::validator_for(schema).map_err(|e| Error::InvalidSchema {
                name: name.to_string(),
                message: e.to_string(),
            })
        };

        let versions = schemas
            .all()
            .iter()
            .map(compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            any_version: compile(&json!({ "oneOf": schemas.all() }))?,
            versions,
            latest: compile(schemas.latest())?,
        })
    }

    /// Accept a document valid under exactly one historical schema.
    ///
    /// On failure the report targets the schema of the document's own
    /// `version` when there is one, since errors from every other
    /// alternative are mostly noise.
    pub(crate) fn check_any_version(&self, document: &Value) -> std::result::Result<(), ValidationReport> {
        if self.any_version.is_valid(document) {
            return Ok(());
        }

        let target = document
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|version| self.versions.get(usize::try_from(version).ok()?));

        let report = match target {
            Some(validator) => ValidationReport::from_errors(validator.iter_errors(document)),
            None => ValidationReport::from_errors(
                self.versions
                    .iter()
                    .flat_map(|validator| validator.iter_errors(document)),
            ),
        };

        // Every alternative may pass on its own when the document matches
        // more than one of them
        if report.is_empty() {
            Err(ValidationReport::from_errors(self.any_version.iter_errors(document)))
        } else {
            Err(report)
        }
    }

    pub(crate) fn check_latest(&self, document: &Value) -> std::result::Result<(), ValidationReport> {
        if self.latest.is_valid(document) {
            return Ok(());
        }
        Err(ValidationReport::from_errors(self.latest.iter_errors(document)))
    }
}
