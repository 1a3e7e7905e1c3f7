//! Store-wide settings
//!
//! Settings can be kept in a small TOML, JSON or YAML file and loaded with
//! [`StoreSettings::load`]; missing files and missing keys fall back to
//! defaults.
//!
//! ```toml
//! schemas_dir_name = ".schemas"
//! schema_marker = "yaml-language-server"
//! docs_in_configs = false
//! docs_base_url = "https://example.com/docs"
//!
//! [robustness]
//! lock_timeout_ms = 5000
//! enable_fsync = true
//! ```

use std::path::Path;
use std::time::Duration;

use confkit_fs::{ConfigStore, NormalizedPath, RobustnessConfig};
use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_SCHEMAS_DIR: &str = ".schemas";
pub const DEFAULT_SCHEMA_MARKER: &str = "yaml-language-server";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Directory, next to each config, that holds its schema sidecar
    pub schemas_dir_name: String,
    /// Editor marker used in the first-line schema comment
    pub schema_marker: String,
    /// Default for definitions that don't choose a docs layout themselves
    pub docs_in_configs: bool,
    /// Base URL of `<name>.md` documentation pages
    pub docs_base_url: Option<String>,
    pub robustness: RobustnessSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            schemas_dir_name: DEFAULT_SCHEMAS_DIR.to_string(),
            schema_marker: DEFAULT_SCHEMA_MARKER.to_string(),
            docs_in_configs: false,
            docs_base_url: None,
            robustness: RobustnessSettings::default(),
        }
    }
}

impl StoreSettings {
    /// Load settings from `path`, using defaults when the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let store = ConfigStore::new();
        Ok(store.load_or_default(&NormalizedPath::new(path))?)
    }

    /// Prefix shared by every schema comment, e.g.
    /// `# yaml-language-server: $schema=`.
    pub fn schema_comment_prefix(&self) -> String {
        format!("# {}: $schema=", self.schema_marker)
    }

    pub fn schema_comment(&self, relative_schema_path: &str) -> String {
        format!("{}{relative_schema_path}", self.schema_comment_prefix())
    }

    /// `# Documentation: <base>/<name>.md`, when a docs base URL is set.
    pub fn docs_comment(&self, name: &str) -> Option<String> {
        self.docs_base_url
            .as_deref()
            .map(|base| format!("# Documentation: {}/{name}.md", base.trim_end_matches('/')))
    }

    pub fn robustness(&self) -> RobustnessConfig {
        self.robustness.clone().into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobustnessSettings {
    pub lock_timeout_ms: u64,
    pub enable_fsync: bool,
}

impl Default for RobustnessSettings {
    fn default() -> Self {
        let defaults = RobustnessConfig::default();
        Self {
            lock_timeout_ms: defaults.lock_timeout.as_millis() as u64,
            enable_fsync: defaults.enable_fsync,
        }
    }
}

impl From<RobustnessSettings> for RobustnessConfig {
    fn from(settings: RobustnessSettings) -> Self {
        Self {
            lock_timeout: Duration::from_millis(settings.lock_timeout_ms),
            enable_fsync: settings.enable_fsync,
        }
    }
}
