//! Config definitions and their constructors

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use crate::batch::BatchReport;
use crate::handle::{MutableConfig, ReadonlyConfig};
use crate::locator::{self, ConfigLocation};
use crate::migration::Migrations;
use crate::schema::{CompiledSchemas, SchemaSet};
use crate::session::ConfigSession;
use crate::{Error, Result};

/// Domain check run after schema validation, given the typed config and
/// its path. `Err` carries the message shown to the user.
pub type SemanticCheck<T> = Arc<dyn Fn(&T, &Path) -> std::result::Result<(), String> + Send + Sync>;

pub(crate) struct DefinitionInner<T> {
    pub name: String,
    pub schemas: SchemaSet,
    pub compiled: CompiledSchemas,
    pub migrations: Migrations,
    pub semantic_check: Option<SemanticCheck<T>>,
    pub schema_dir: Option<PathBuf>,
    pub docs_in_configs: Option<bool>,
}

/// Everything needed to load one kind of config.
///
/// Cheap to clone; all clones share the compiled schemas.
pub struct ConfigDefinition<T> {
    inner: Arc<DefinitionInner<T>>,
}

impl<T> Clone for ConfigDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ConfigDefinition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigDefinition")
            .field("name", &self.inner.name)
            .field("latest_version", &self.inner.migrations.latest_version())
            .finish_non_exhaustive()
    }
}

impl<T> ConfigDefinition<T> {
    pub fn builder(name: impl Into<String>) -> ConfigDefinitionBuilder<T> {
        ConfigDefinitionBuilder {
            name: name.into(),
            all: Vec::new(),
            latest: None,
            migrations: Migrations::new(),
            semantic_check: None,
            schema_dir: None,
            docs_in_configs: None,
        }
    }

    /// Base name of the config file, without extension.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.inner.schemas
    }

    pub fn latest_version(&self) -> u64 {
        self.inner.migrations.latest_version()
    }

    /// Where a config for this definition lives under `path_or_dir`.
    pub fn locate(&self, path_or_dir: impl AsRef<Path>) -> ConfigLocation {
        ConfigLocation::resolve(path_or_dir, &locator::file_name_for(&self.inner.name))
    }
}

impl<T> ConfigDefinition<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Load a readonly config, `None` when the file doesn't exist.
    pub async fn init_readonly(
        &self,
        session: &ConfigSession,
        path_or_dir: impl AsRef<Path>,
    ) -> Result<Option<ReadonlyConfig<T>>> {
        let location = self.locate(path_or_dir);
        let loaded = self
            .inner
            .load(session.settings(), location, None::<fn() -> String>)
            .await?;
        Ok(loaded.map(ReadonlyConfig::new))
    }

    /// Load a readonly config, creating it from `default` when missing.
    pub async fn init_readonly_with_default<F>(
        &self,
        session: &ConfigSession,
        path_or_dir: impl AsRef<Path>,
        default: F,
    ) -> Result<ReadonlyConfig<T>>
    where
        F: FnOnce() -> String,
    {
        let location = self.locate(path_or_dir);
        let path = location.path.to_native();
        self.inner
            .load(session.settings(), location, Some(default))
            .await?
            .map(ReadonlyConfig::new)
            .ok_or_else(|| Error::parse(path, "config was not created from its default"))
    }

    /// Load a mutable config, `None` when the file doesn't exist.
    ///
    /// Fails with [`Error::AlreadyInitialized`] if this session already
    /// holds a mutable handle for the same file.
    pub async fn init(
        &self,
        session: &ConfigSession,
        path_or_dir: impl AsRef<Path>,
    ) -> Result<Option<MutableConfig<T>>> {
        self.init_mutable(session, path_or_dir.as_ref(), None::<fn() -> String>)
            .await
    }

    /// Load a mutable config, creating it from `default` when missing.
    pub async fn init_with_default<F>(
        &self,
        session: &ConfigSession,
        path_or_dir: impl AsRef<Path>,
        default: F,
    ) -> Result<MutableConfig<T>>
    where
        F: FnOnce() -> String,
    {
        let path_or_dir = path_or_dir.as_ref();
        self.init_mutable(session, path_or_dir, Some(default))
            .await?
            .ok_or_else(|| Error::parse(path_or_dir, "config was not created from its default"))
    }

    /// Load mutable configs at every path concurrently.
    ///
    /// A failure only affects its own path; the report holds every handle
    /// that loaded alongside the errors.
    pub async fn init_all<I, P>(&self, session: &ConfigSession, paths: I) -> BatchReport<MutableConfig<T>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        BatchReport::collect(paths.into_iter().map(move |path| {
            let path = path.as_ref().to_path_buf();
            (path.clone(), self.init(session, path))
        }))
        .await
    }

    /// Readonly counterpart of [`init_all`](Self::init_all).
    pub async fn init_all_readonly<I, P>(
        &self,
        session: &ConfigSession,
        paths: I,
    ) -> BatchReport<ReadonlyConfig<T>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        BatchReport::collect(paths.into_iter().map(move |path| {
            let path = path.as_ref().to_path_buf();
            (path.clone(), self.init_readonly(session, path))
        }))
        .await
    }

    async fn init_mutable<F>(
        &self,
        session: &ConfigSession,
        path_or_dir: &Path,
        default: Option<F>,
    ) -> Result<Option<MutableConfig<T>>>
    where
        F: FnOnce() -> String,
    {
        let location = self.locate(path_or_dir);

        // Checked before any I/O so a duplicate never touches the file
        for candidate in location.candidates() {
            if session.registry().is_registered(&candidate.path)? {
                error!(
                    name = %self.inner.name,
                    path = %candidate.path,
                    "Mutable config initialized twice"
                );
                return Err(Error::AlreadyInitialized {
                    path: candidate.path.to_native(),
                });
            }
        }

        let Some(loaded) = self.inner.load(session.settings(), location, default).await? else {
            return Ok(None);
        };
        session.registry().register(&loaded.location.path)?;

        Ok(Some(MutableConfig::new(
            Arc::clone(&self.inner),
            loaded,
            session.settings().robustness(),
        )))
    }
}

/// Builder for [`ConfigDefinition`].
pub struct ConfigDefinitionBuilder<T> {
    name: String,
    all: Vec<Value>,
    latest: Option<Value>,
    migrations: Migrations,
    semantic_check: Option<SemanticCheck<T>>,
    schema_dir: Option<PathBuf>,
    docs_in_configs: Option<bool>,
}

impl<T> ConfigDefinitionBuilder<T> {
    /// Schemas for every version, indexed by version, and the latest one.
    pub fn schemas(mut self, all: Vec<Value>, latest: Value) -> Self {
        self.all = all;
        self.latest = Some(latest);
        self
    }

    pub fn migrations(mut self, migrations: Migrations) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn validate(
        mut self,
        check: impl Fn(&T, &Path) -> std::result::Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.semantic_check = Some(Arc::new(check));
        self
    }

    /// Put sidecars here instead of next to each config.
    pub fn schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    /// Keep the default text verbatim (with its comments) when creating a
    /// config, instead of rendering it under the schema description.
    pub fn docs_in_configs(mut self, enabled: bool) -> Self {
        self.docs_in_configs = Some(enabled);
        self
    }

    /// Check the schema chain and compile validators.
    pub fn build(self) -> Result<ConfigDefinition<T>> {
        if self.all.is_empty() || self.all.len() != self.migrations.len() + 1 {
            return Err(Error::SchemaChain {
                name: self.name,
                schemas: self.all.len(),
                migrations: self.migrations.len(),
            });
        }

        let latest = match self.latest {
            Some(latest) => latest,
            None => self.all[self.all.len() - 1].clone(),
        };
        let schemas = SchemaSet::new(self.all, latest);
        let compiled = CompiledSchemas::compile(&self.name, &schemas)?;

        Ok(ConfigDefinition {
            inner: Arc::new(DefinitionInner {
                name: self.name,
                schemas,
                compiled,
                migrations: self.migrations,
                semantic_check: self.semantic_check,
                schema_dir: self.schema_dir,
                docs_in_configs: self.docs_in_configs,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(version: u64) -> Value {
        json!({"type": "object", "properties": {"version": {"const": version}}, "required": ["version"]})
    }

    #[test]
    fn test_build_requires_one_schema_per_version() {
        let result = ConfigDefinition::<Value>::builder("project")
            .schemas(vec![schema(0), schema(1)], schema(1))
            .build();
        assert!(matches!(
            result,
            Err(Error::SchemaChain {
                schemas: 2,
                migrations: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_build_rejects_empty_chain() {
        let result = ConfigDefinition::<Value>::builder("project").build();
        assert!(matches!(result, Err(Error::SchemaChain { .. })));
    }

    #[test]
    fn test_build_consistent_chain() {
        let definition = ConfigDefinition::<Value>::builder("project")
            .schemas(vec![schema(0), schema(1)], schema(1))
            .migrations(Migrations::new().raw(Ok))
            .build()
            .unwrap();
        assert_eq!(definition.name(), "project");
        assert_eq!(definition.latest_version(), 1);
        assert_eq!(definition.schemas().len(), 2);
    }

    #[test]
    fn test_locate_uses_canonical_name() {
        let definition = ConfigDefinition::<Value>::builder("project")
            .schemas(vec![schema(0)], schema(0))
            .build()
            .unwrap();
        assert_eq!(
            definition.locate("configs").path.as_str(),
            "configs/project.yaml"
        );
    }
}
