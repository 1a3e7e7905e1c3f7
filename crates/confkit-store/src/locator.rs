//! Resolving where a config file lives
//!
//! Callers pass either a directory or a full file path. A directory gets
//! the definition's canonical `<name>.yaml` appended. When the resolved
//! file is missing, the sibling with the other YAML extension is tried,
//! and whichever exists becomes the path used for every later write.

use std::path::Path;

use confkit_fs::NormalizedPath;
use tracing::debug;

use crate::{Result, io};

pub const YAML_EXTENSION: &str = "yaml";
pub const YML_EXTENSION: &str = "yml";

/// Canonical file name for a definition.
pub fn file_name_for(name: &str) -> String {
    format!("{name}.{YAML_EXTENSION}")
}

fn has_yaml_extension(path: &str) -> bool {
    path.ends_with(&format!(".{YAML_EXTENSION}")) || path.ends_with(&format!(".{YML_EXTENSION}"))
}

/// A config file path and the directory that contains it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLocation {
    pub path: NormalizedPath,
    pub dir: NormalizedPath,
}

impl ConfigLocation {
    /// Resolve a directory or file path to the config file it designates.
    ///
    /// # Arguments
    ///
    /// * `path_or_dir` - A `.yaml`/`.yml` file path, or a directory
    /// * `file_name` - Canonical file name to use inside a directory
    ///
    /// # Example
    ///
    /// ```
    /// use confkit_store::ConfigLocation;
    ///
    /// let location = ConfigLocation::resolve("/work/project", "project.yaml");
    /// assert_eq!(location.path.as_str(), "/work/project/project.yaml");
    /// assert_eq!(location.dir.as_str(), "/work/project");
    /// ```
    pub fn resolve(path_or_dir: impl AsRef<Path>, file_name: &str) -> Self {
        let given = NormalizedPath::new(path_or_dir);
        if has_yaml_extension(given.as_str()) {
            let dir = given.parent().unwrap_or_else(|| NormalizedPath::new("."));
            Self { path: given, dir }
        } else {
            Self {
                path: given.join(file_name),
                dir: given,
            }
        }
    }

    /// Same file with the other YAML extension.
    pub fn sibling(&self) -> Option<Self> {
        let other = match self.path.extension()? {
            YAML_EXTENSION => YML_EXTENSION,
            YML_EXTENSION => YAML_EXTENSION,
            _ => return None,
        };
        Some(Self {
            path: self.path.with_extension(other)?,
            dir: self.dir.clone(),
        })
    }

    /// The resolved path followed by its sibling.
    pub fn candidates(&self) -> Vec<Self> {
        std::iter::once(self.clone()).chain(self.sibling()).collect()
    }
}

/// Read the first candidate that exists.
pub(crate) async fn read_existing(location: &ConfigLocation) -> Result<Option<(ConfigLocation, String)>> {
    for candidate in location.candidates() {
        if let Some(content) = io::read_if_exists(&candidate.path).await? {
            if candidate.path != location.path {
                debug!(path = %candidate.path, "Using sibling extension");
            }
            return Ok(Some((candidate, content)));
        }
    }
    Ok(None)
}
