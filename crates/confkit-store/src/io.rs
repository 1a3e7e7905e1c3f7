//! Async wrappers over confkit-fs primitives

use std::io::ErrorKind;

use confkit_fs::{NormalizedPath, RobustnessConfig, io};

use crate::Result;

/// Read a file as UTF-8, `None` when it doesn't exist.
pub(crate) async fn read_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path.to_native()).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(confkit_fs::Error::io(path.to_native(), e).into()),
    }
}

/// Atomic locked write, run on the blocking pool.
pub(crate) async fn write(path: &NormalizedPath, content: String, robustness: RobustnessConfig) -> Result<()> {
    let target = path.clone();
    tokio::task::spawn_blocking(move || io::write_atomic(&target, content.as_bytes(), robustness))
        .await
        .map_err(|e| confkit_fs::Error::io(path.to_native(), std::io::Error::other(e)))??;
    Ok(())
}
