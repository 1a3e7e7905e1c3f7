//! Process-level context shared by every config load

use std::path::Path;

use crate::registry::InstanceRegistry;
use crate::settings::StoreSettings;
use crate::Result;

/// Settings plus the mutable-instance registry.
///
/// One session is normally created at startup and passed by reference to
/// every load. Separate sessions don't see each other's instances, which
/// keeps tests isolated.
#[derive(Debug, Default)]
pub struct ConfigSession {
    settings: StoreSettings,
    registry: InstanceRegistry,
}

impl ConfigSession {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            registry: InstanceRegistry::new(),
        }
    }

    /// Session using settings read from `path` (defaults when absent).
    pub fn from_settings_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(StoreSettings::load(path)?))
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }
}
