//! Error types for confkit-store

use std::path::PathBuf;

use crate::migration::MigrationError;
use crate::schema::ValidationReport;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] confkit_fs::Error),

    #[error("Content error: {0}")]
    Content(#[from] confkit_content::Error),

    #[error("Failed to parse config at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(
        "Schema chain for '{name}' is inconsistent: {schemas} schemas for {migrations} migrations (expected one more schema than migrations)"
    )]
    SchemaChain {
        name: String,
        schemas: usize,
        migrations: usize,
    },

    #[error("Invalid JSON schema for '{name}': {message}")]
    InvalidSchema { name: String, message: String },

    #[error("Invalid config at {path}. {report}")]
    InvalidConfig {
        path: PathBuf,
        report: ValidationReport,
    },

    #[error("Couldn't migrate config {path} from version {from} to {to}: {source}")]
    MigrationRun {
        path: PathBuf,
        from: u64,
        to: u64,
        #[source]
        source: MigrationError,
    },

    #[error(
        "Invalid config {path} after successful migration. Config after migration looks like this:\n\n{document}\n\n{report}"
    )]
    PostMigrationInvalid {
        path: PathBuf,
        document: String,
        report: ValidationReport,
    },

    #[error("Config at {path} does not fit its type: {message}")]
    Deserialize { path: PathBuf, message: String },

    #[error("Couldn't serialize config {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    #[error(
        "Mutable config {path} was already initialized. Please initialize readonly config instead or use previously initialized mutable config"
    )]
    AlreadyInitialized { path: PathBuf },

    #[error("Couldn't save config {path}. {report}")]
    CommitValidation {
        path: PathBuf,
        report: ValidationReport,
    },

    #[error("{failed} of {total} configs failed to load:\n\n{report}")]
    Batch {
        failed: usize,
        total: usize,
        report: String,
    },
}

impl Error {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(path: impl Into<PathBuf>, report: ValidationReport) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            report,
        }
    }
}
