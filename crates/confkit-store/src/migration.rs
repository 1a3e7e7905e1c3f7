//! Ordered migrations between config versions
//!
//! Migration `i` turns a version `i` document into a version `i + 1`
//! document. The runner applies them in order starting at a document's
//! own version and stamps `version` after every step, so individual
//! migrations never have to.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Error a migration step may return.
pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

type Step = Box<dyn Fn(Value) -> Result<Value, MigrationError> + Send + Sync>;

/// Closed, ordered table of migration steps.
#[derive(Default)]
pub struct Migrations {
    steps: Vec<Step>,
}

impl std::fmt::Debug for Migrations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrations")
            .field("steps", &self.steps.len())
            .finish()
    }
}

impl Migrations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step working on the raw parsed document.
    pub fn raw(
        mut self,
        step: impl Fn(Value) -> Result<Value, MigrationError> + Send + Sync + 'static,
    ) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append a step between two typed versions of the config.
    ///
    /// The document is deserialized into `From` before the step runs and
    /// the result serialized back, so a shape mismatch surfaces as a
    /// migration error.
    pub fn typed<From, To>(
        self,
        step: impl Fn(From) -> Result<To, MigrationError> + Send + Sync + 'static,
    ) -> Self
    where
        From: DeserializeOwned + 'static,
        To: Serialize + 'static,
    {
        self.raw(move |value| {
            let input: From = serde_json::from_value(value)?;
            let output = step(input)?;
            Ok(serde_json::to_value(output)?)
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Version every document ends at.
    pub fn latest_version(&self) -> u64 {
        self.steps.len() as u64
    }

    /// Run every step from `from` up to the latest version.
    pub(crate) fn run(&self, mut value: Value, from: u64) -> Result<Value, MigrationFailure> {
        let start = usize::try_from(from).unwrap_or(usize::MAX);
        for (index, step) in self.steps.iter().enumerate().skip(start) {
            let current = index as u64;
            let next = current + 1;
            let fail = |source: MigrationError| MigrationFailure {
                from: current,
                to: next,
                source,
            };

            value = step(value).map_err(fail)?;
            match value.as_object_mut() {
                Some(map) => {
                    map.insert("version".to_string(), Value::from(next));
                }
                None => return Err(fail("migration must produce a mapping".into())),
            }
            debug!(from = current, to = next, "Applied migration");
        }
        Ok(value)
    }
}

/// A step that failed, with the versions it was moving between.
#[derive(Debug)]
pub(crate) struct MigrationFailure {
    pub from: u64,
    pub to: u64,
    pub source: MigrationError,
}
