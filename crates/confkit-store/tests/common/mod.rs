#![allow(dead_code)]

use confkit_store::{ConfigDefinition, ConfigSession, Migrations, StoreSettings};
use confkit_test_utils::schemas::{PROJECT, project_schemas, project_v1, rename_key};
use serde::{Deserialize, Serialize};

pub const HEADER: &str = "# yaml-language-server: $schema=.schemas/project.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub items: Vec<String>,
}

pub fn builder() -> confkit_store::ConfigDefinitionBuilder<Project> {
    ConfigDefinition::builder(PROJECT)
        .schemas(project_schemas(), project_v1())
        .migrations(Migrations::new().raw(|config| Ok(rename_key(config, "list", "items"))))
}

pub fn project_definition() -> ConfigDefinition<Project> {
    builder().build().unwrap()
}

pub fn session() -> ConfigSession {
    confkit_test_utils::init_tracing();
    ConfigSession::default()
}

pub fn session_with(settings: StoreSettings) -> ConfigSession {
    confkit_test_utils::init_tracing();
    ConfigSession::new(settings)
}

/// Give the filesystem clock a chance to tick so rewrites show in mtimes.
pub fn let_clock_tick() {
    std::thread::sleep(std::time::Duration::from_millis(50));
}
