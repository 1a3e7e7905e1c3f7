//! The load pipeline shared by readonly and mutable initialization
//!
//! ```text
//! locate ──► read (or synthesize default) ──► schema comment
//!        ──► any-version validation ──► migrate ──► text merge
//!        ──► latest validation ──► semantic check ──► persist
//! ```
//!
//! Nothing is written unless the text actually changed, so loading an
//! up-to-date config is free of filesystem writes.

use std::path::Path;

use confkit_content::{YamlDocument, format_config, merge, parse_yaml, unified_text_diff};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::definition::DefinitionInner;
use crate::locator::{self, ConfigLocation};
use crate::schema::ValidationReport;
use crate::settings::StoreSettings;
use crate::{Error, Result, io, sidecar};

/// A config that made it through the pipeline.
pub(crate) struct Loaded<T> {
    pub location: ConfigLocation,
    /// Text as persisted, paired with its value
    pub document: YamlDocument,
    pub data: T,
}

/// Put `header` on the first line of `content`.
///
/// An existing schema comment (a first non-blank line starting with
/// `prefix`) is replaced; otherwise the header is prepended.
pub(crate) fn with_schema_header(content: &str, header: &str, prefix: &str) -> String {
    let blank_prefix: usize = content
        .split_inclusive('\n')
        .take_while(|line| line.trim().is_empty())
        .map(str::len)
        .sum();
    let body = &content[blank_prefix..];
    let text = if body.starts_with(prefix) {
        match body.split_once('\n') {
            Some((_, rest)) => format!("{header}\n{rest}"),
            None => header.to_string(),
        }
    } else {
        format!("{header}\n{body}")
    };
    format!("{}\n", text.trim())
}

fn document_version(document: &Value) -> Option<u64> {
    document.get("version").and_then(Value::as_u64)
}

impl<T> DefinitionInner<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) async fn load<F>(
        &self,
        settings: &StoreSettings,
        location: ConfigLocation,
        default: Option<F>,
    ) -> Result<Option<Loaded<T>>>
    where
        F: FnOnce() -> String,
    {
        let robustness = settings.robustness();

        let (location, text) = match locator::read_existing(&location).await? {
            Some((found, content)) => {
                let header = self.schema_header(settings, &found).await?;
                let text = with_schema_header(&content, &header, &settings.schema_comment_prefix());
                if text == content {
                    (found, content)
                } else {
                    let formatted = format_config(&text);
                    debug!(path = %found.path, "Updating schema comment");
                    io::write(&found.path, formatted.clone(), robustness).await?;
                    (found, formatted)
                }
            }
            None => {
                let Some(default) = default else {
                    debug!(path = %location.path, "Config not found");
                    return Ok(None);
                };
                let header = self.schema_header(settings, &location).await?;
                let text = self.initial_text(settings, &location, &header, &default())?;
                let formatted = format_config(&text);
                info!(path = %location.path, "Creating config from default");
                io::write(&location.path, formatted.clone(), robustness).await?;
                (location, formatted)
            }
        };

        let path = location.path.to_native();
        let document = YamlDocument::parse(text).map_err(|e| Error::parse(&path, e.to_string()))?;

        self.compiled
            .check_any_version(document.value())
            .map_err(|report| Error::invalid_config(&path, report))?;

        let latest = self.migrations.latest_version();
        let version = document_version(document.value()).ok_or_else(|| {
            Error::invalid_config(
                &path,
                ValidationReport::message("`version` must be a non-negative integer"),
            )
        })?;

        if version > latest {
            return Err(Error::invalid_config(
                &path,
                ValidationReport::message(format!(
                    "version {version} is newer than the latest supported version {latest}"
                )),
            ));
        }

        if version < latest {
            return self.migrate(settings, location, document, version).await.map(Some);
        }

        self.compiled
            .check_latest(document.value())
            .map_err(|report| Error::invalid_config(&path, report))?;
        let data = self.deserialize(&path, document.value())?;
        self.check(&data, &path)
            .map_err(|report| Error::invalid_config(&path, report))?;

        debug!(path = %location.path, version, "Loaded config");
        Ok(Some(Loaded {
            location,
            document,
            data,
        }))
    }

    async fn migrate(
        &self,
        settings: &StoreSettings,
        location: ConfigLocation,
        mut document: YamlDocument,
        version: u64,
    ) -> Result<Loaded<T>> {
        let path = location.path.to_native();
        let latest = self.migrations.latest_version();

        let migrated = self
            .migrations
            .run(document.value().clone(), version)
            .map_err(|failure| Error::MigrationRun {
                path: path.clone(),
                from: failure.from,
                to: failure.to,
                source: failure.source,
            })?;

        let migrated_text = document.merged_text(&migrated)?;
        let invalid = |report| Error::PostMigrationInvalid {
            path: path.clone(),
            document: migrated_text.clone(),
            report,
        };

        self.compiled.check_latest(&migrated).map_err(invalid)?;
        let data = self.deserialize(&path, &migrated)?;
        self.check(&data, &path).map_err(invalid)?;

        if migrated_text != document.text() {
            let formatted = format_config(&migrated_text);
            io::write(&location.path, formatted.clone(), settings.robustness()).await?;
            info!(path = %location.path, from = version, to = latest, "Migrated config");
            debug!(diff = %unified_text_diff(document.text(), &formatted), "Migration diff");
            document.replace_text(formatted)?;
        }

        Ok(Loaded {
            location,
            document,
            data,
        })
    }

    /// Write the sidecar if needed and return the schema comment line.
    async fn schema_header(&self, settings: &StoreSettings, location: &ConfigLocation) -> Result<String> {
        let dir = sidecar::schemas_dir(
            &location.dir,
            self.schema_dir.as_deref(),
            &settings.schemas_dir_name,
        );
        let relative = sidecar::ensure_schema(
            &self.name,
            &location.dir,
            &dir,
            self.schemas.latest(),
            settings.robustness(),
        )
        .await?;
        Ok(settings.schema_comment(relative.as_str()))
    }

    /// Text for a config created from its default content.
    ///
    /// With docs kept in configs the default text is used verbatim, so its
    /// inline comments survive. Otherwise the default is re-rendered under
    /// the schema description.
    fn initial_text(
        &self,
        settings: &StoreSettings,
        location: &ConfigLocation,
        header: &str,
        default_text: &str,
    ) -> Result<String> {
        let docs = settings.docs_comment(&self.name);

        if self.docs_in_configs.unwrap_or(settings.docs_in_configs) {
            let mut parts = vec![header.to_string()];
            parts.extend(docs);
            parts.push(default_text.to_string());
            return Ok(parts.join("\n"));
        }

        let mut base = header.to_string();
        if let Some(description) = self.schemas.description() {
            base.push_str("\n\n");
            let commented: Vec<String> = description
                .lines()
                .map(|line| if line.is_empty() { "#".to_string() } else { format!("# {line}") })
                .collect();
            base.push_str(&commented.join("\n"));
        }
        base.push('\n');
        if let Some(docs) = docs {
            base.push_str(&docs);
            base.push('\n');
        }

        let default_value =
            parse_yaml(default_text).map_err(|e| Error::parse(location.path.to_native(), e.to_string()))?;
        Ok(merge(&base, &Value::Null, &default_value)?)
    }

    fn deserialize(&self, path: &Path, value: &Value) -> Result<T> {
        serde_json::from_value(value.clone()).map_err(|e| Error::Deserialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Latest-schema validation followed by the semantic check.
    pub(crate) fn validate_latest(&self, value: &Value, data: &T, path: &Path) -> std::result::Result<(), ValidationReport> {
        self.compiled.check_latest(value)?;
        self.check(data, path)
    }

    fn check(&self, data: &T, path: &Path) -> std::result::Result<(), ValidationReport> {
        match &self.semantic_check {
            Some(check) => check(data, path).map_err(ValidationReport::message),
            None => Ok(()),
        }
    }
}
