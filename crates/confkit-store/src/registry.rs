//! Registry of mutable config instances
//!
//! At most one mutable handle may exist per config file within a session,
//! otherwise two handles could commit conflicting edits over each other.
//! Paths are made absolute before they are compared, so `./a/../a/x.yaml`
//! and `a/x.yaml` are the same instance.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use confkit_fs::NormalizedPath;

use crate::{Error, Result};

/// Set of config paths that already have a mutable handle.
///
/// # Example
///
/// ```
/// use confkit_store::InstanceRegistry;
///
/// let registry = InstanceRegistry::new();
/// registry.register("configs/project.yaml").unwrap();
/// assert!(registry.is_registered("configs/./project.yaml").unwrap());
/// assert!(registry.register("configs/project.yaml").is_err());
/// ```
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    paths: Mutex<HashSet<NormalizedPath>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn paths(&self) -> MutexGuard<'_, HashSet<NormalizedPath>> {
        // The set stays consistent even if a holder panicked
        self.paths.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_registered(&self, path: impl AsRef<Path>) -> Result<bool> {
        let key = NormalizedPath::absolute(path)?;
        Ok(self.paths().contains(&key))
    }

    /// Record a mutable instance for `path`.
    ///
    /// Fails with [`Error::AlreadyInitialized`] when one is already
    /// recorded.
    pub fn register(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let key = NormalizedPath::absolute(path)?;
        if !self.paths().insert(key) {
            return Err(Error::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.paths().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths().is_empty()
    }
}
