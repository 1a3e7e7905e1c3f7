//! Handles to loaded configs
//!
//! Both handles dereference to the typed config. A [`MutableConfig`] also
//! remembers the text it was loaded from, which is what lets
//! [`commit`](MutableConfig::commit) patch only the values that changed.

use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;

use confkit_content::{SemanticDiff, YamlDocument, format_config};
use confkit_fs::RobustnessConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::definition::DefinitionInner;
use crate::loader::Loaded;
use crate::locator::ConfigLocation;
use crate::{Error, Result, io};

/// What [`MutableConfig::commit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Written,
    /// The file already held this content
    Unchanged,
}

/// A validated config that can't be written back.
#[derive(Debug, Clone)]
pub struct ReadonlyConfig<T> {
    data: T,
    location: ConfigLocation,
    document: YamlDocument,
}

impl<T> ReadonlyConfig<T> {
    pub(crate) fn new(loaded: Loaded<T>) -> Self {
        Self {
            data: loaded.data,
            location: loaded.location,
            document: loaded.document,
        }
    }

    /// Absolute or caller-relative path of the file, as resolved.
    pub fn path(&self) -> &Path {
        self.location.path.as_ref()
    }

    pub fn dir_path(&self) -> &Path {
        self.location.dir.as_ref()
    }

    /// Text of the file as last read or written.
    pub fn config_string(&self) -> &str {
        self.document.text()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> Deref for ReadonlyConfig<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// A validated config that can be edited and committed.
///
/// At most one exists per file within a [`ConfigSession`](crate::ConfigSession).
///
/// [`commit`](Self::commit) writes back what `T` serializes to. Keys the
/// schema allows but `T` doesn't model are removed from the file on the
/// next commit, unless `T` keeps them in a catch-all field:
///
/// ```
/// # use serde::{Deserialize, Serialize};
/// #[derive(Serialize, Deserialize)]
/// struct Project {
///     version: u64,
///     #[serde(flatten)]
///     extra: serde_json::Map<String, serde_json::Value>,
/// }
/// ```
pub struct MutableConfig<T> {
    data: T,
    location: ConfigLocation,
    document: YamlDocument,
    definition: Arc<DefinitionInner<T>>,
    robustness: RobustnessConfig,
}

impl<T: std::fmt::Debug> std::fmt::Debug for MutableConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutableConfig")
            .field("path", &self.location.path)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

impl<T> MutableConfig<T> {
    pub(crate) fn new(definition: Arc<DefinitionInner<T>>, loaded: Loaded<T>, robustness: RobustnessConfig) -> Self {
        Self {
            data: loaded.data,
            location: loaded.location,
            document: loaded.document,
            definition,
            robustness,
        }
    }

    pub fn path(&self) -> &Path {
        self.location.path.as_ref()
    }

    pub fn dir_path(&self) -> &Path {
        self.location.dir.as_ref()
    }

    /// Text of the file as last read or written.
    pub fn config_string(&self) -> &str {
        self.document.text()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

impl<T> MutableConfig<T>
where
    T: Serialize + DeserializeOwned,
{
    fn current_value(&self) -> Result<Value> {
        serde_json::to_value(&self.data).map_err(|e| Error::Serialize {
            path: self.location.path.to_native(),
            message: e.to_string(),
        })
    }

    /// Changes made in memory since the last load or commit.
    pub fn pending_changes(&self) -> Result<SemanticDiff> {
        Ok(self.document.diff(&self.current_value()?))
    }

    /// Validate the in-memory config and write it if the text changed.
    ///
    /// Untouched values keep their original text and comments. On a
    /// validation failure nothing is written and the handle keeps its
    /// edits.
    pub async fn commit(&mut self) -> Result<CommitOutcome> {
        let path = self.location.path.to_native();
        let value = self.current_value()?;

        self.definition
            .validate_latest(&value, &self.data, &path)
            .map_err(|report| Error::CommitValidation {
                path: path.clone(),
                report,
            })?;

        let merged = self.document.merged_text(&value)?;
        let candidate = format!("{}\n", merged.trim());
        if candidate == self.document.text() {
            debug!(path = %self.location.path, "Config unchanged");
            return Ok(CommitOutcome::Unchanged);
        }

        let formatted = format_config(&candidate);
        if formatted == self.document.text() {
            debug!(path = %self.location.path, "Config unchanged after formatting");
            return Ok(CommitOutcome::Unchanged);
        }

        io::write(&self.location.path, formatted.clone(), self.robustness).await?;
        self.document.replace_text(formatted)?;
        info!(path = %self.location.path, "Config committed");
        Ok(CommitOutcome::Written)
    }
}

impl<T> Deref for MutableConfig<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> DerefMut for MutableConfig<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data
    }
}
