//! Versioned configuration persistence.
//!
//! A [`ConfigDefinition`] describes one kind of YAML config: its schema
//! for every historical `version`, the migrations between them and an
//! optional semantic check. Loading a file validates it against any known
//! version, migrates it to the latest one and writes it back with its
//! comments and layout intact. Mutable handles can later `commit` edits
//! through the same text-preserving merge.
//!
//! ```no_run
//! use confkit_store::{ConfigDefinition, ConfigSession, Migrations};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Project {
//!     version: u64,
//!     items: Vec<String>,
//! }
//!
//! # async fn run() -> confkit_store::Result<()> {
//! let v0 = json!({"type": "object", "properties": {"version": {"const": 0}}, "required": ["version"]});
//! let v1 = json!({"type": "object", "properties": {"version": {"const": 1}}, "required": ["version"]});
//! let definition = ConfigDefinition::<Project>::builder("project")
//!     .schemas(vec![v0, v1.clone()], v1)
//!     .migrations(Migrations::new().raw(|mut config| {
//!         if let Some(list) = config.as_object_mut().and_then(|m| m.remove("list")) {
//!             config["items"] = list;
//!         }
//!         Ok(config)
//!     }))
//!     .build()?;
//!
//! let session = ConfigSession::default();
//! if let Some(mut project) = definition.init(&session, "./configs").await? {
//!     project.items.push("b".into());
//!     project.commit().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod definition;
pub mod error;
pub mod handle;
mod io;
mod loader;
pub mod locator;
pub mod migration;
pub mod registry;
pub mod schema;
pub mod session;
pub mod settings;
pub mod sidecar;

pub use batch::BatchReport;
pub use definition::{ConfigDefinition, ConfigDefinitionBuilder, SemanticCheck};
pub use error::{Error, Result};
pub use handle::{CommitOutcome, MutableConfig, ReadonlyConfig};
pub use locator::ConfigLocation;
pub use migration::{MigrationError, Migrations};
pub use registry::InstanceRegistry;
pub use schema::{SchemaSet, ValidationReport};
pub use session::ConfigSession;
pub use settings::{RobustnessSettings, StoreSettings};
