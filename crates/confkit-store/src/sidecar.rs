//! Schema sidecar files
//!
//! Each config gets the JSON schema of its latest version written to
//! `<schemas dir>/<name>.json`, and points to it from its first line so
//! editors can offer completion and validation. The sidecar is rewritten
//! only when its content differs, so repeated loads leave it untouched.

use std::path::Path;

use confkit_fs::{NormalizedPath, RobustnessConfig, relative_path};
use serde_json::Value;
use tracing::{debug, info};

use crate::{Error, Result, io};

/// Directory holding sidecars for configs in `config_dir`.
pub fn schemas_dir(config_dir: &NormalizedPath, override_dir: Option<&Path>, dir_name: &str) -> NormalizedPath {
    match override_dir {
        Some(dir) => NormalizedPath::new(dir),
        None => config_dir.join(dir_name),
    }
}

/// Text a sidecar is expected to contain.
pub fn render_schema(schema: &Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(schema).map_err(|e| Error::Serialize {
        path: "<schema>".into(),
        message: e.to_string(),
    })?;
    text.push('\n');
    Ok(text)
}

/// Make sure the sidecar for `name` is up to date.
///
/// Returns the sidecar's path relative to `config_dir`, ready to embed
/// in a schema comment.
pub async fn ensure_schema(
    name: &str,
    config_dir: &NormalizedPath,
    schemas_dir: &NormalizedPath,
    schema: &Value,
    robustness: RobustnessConfig,
) -> Result<NormalizedPath> {
    let path = schemas_dir.join(&format!("{name}.json"));
    let expected = render_schema(schema)?;

    match io::read_if_exists(&path).await? {
        Some(current) if current == expected => {}
        Some(_) => {
            info!(path = %path, "Refreshing stale schema sidecar");
            io::write(&path, expected, robustness).await?;
        }
        None => {
            debug!(path = %path, "Writing schema sidecar");
            io::write(&path, expected, robustness).await?;
        }
    }

    Ok(relative_path(config_dir, &path)?)
}
