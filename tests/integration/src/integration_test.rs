//! End-to-end test for the vertical slice
//!
//! Exercises the complete flow: settings file -> batch load with
//! migration -> edit -> commit -> reload.

use confkit_store::{
    CommitOutcome, ConfigDefinition, ConfigSession, Error, Migrations, StoreSettings,
};
use confkit_test_utils::TestDir;
use confkit_test_utils::schemas::{PROJECT, project_schemas, project_v1, rename_key};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Project {
    version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    items: Vec<String>,
}

fn definition() -> ConfigDefinition<Project> {
    ConfigDefinition::builder(PROJECT)
        .schemas(project_schemas(), project_v1())
        .migrations(Migrations::new().raw(|config| Ok(rename_key(config, "list", "items"))))
        .validate(|project: &Project, _| match &project.name {
            Some(name) if name.trim().is_empty() => Err("name must not be blank".to_string()),
            _ => Ok(()),
        })
        .build()
        .unwrap()
}

/// A workspace with configs at every stage of their life.
fn setup_workspace() -> TestDir {
    let dir = TestDir::new();
    dir.write(
        "confkit.yaml",
        "docs_base_url: https://docs.example.com\nrobustness:\n  enable_fsync: false\n",
    );
    dir.write(
        "services/api/project.yaml",
        "# api service\nversion: 0\n\n# built first\nlist:\n  - server\n  - client\n",
    );
    dir.write("services/web/project.yml", "version: 1\nname: web\nitems: [bundle]\n");
    dir.write("services/broken/project.yaml", "version: 99\nitems: []\n");
    dir
}

#[tokio::test]
async fn test_settings_file_loaded() {
    let dir = setup_workspace();
    let session = ConfigSession::from_settings_file(dir.join("confkit.yaml")).unwrap();

    assert_eq!(
        session.settings().docs_base_url.as_deref(),
        Some("https://docs.example.com")
    );
    assert!(!session.settings().robustness.enable_fsync);
    assert_eq!(session.settings().schemas_dir_name, StoreSettings::default().schemas_dir_name);
}

#[tokio::test]
async fn test_batch_edit_commit_reload() {
    let dir = setup_workspace();
    let session = ConfigSession::from_settings_file(dir.join("confkit.yaml")).unwrap();
    let definition = definition();

    let report = definition
        .init_all(
            &session,
            ["api", "web", "broken"].map(|name| dir.join(&format!("services/{name}"))),
        )
        .await;

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.summary().unwrap().contains("broken"));

    let mut handles: Vec<_> = report.loaded.into_iter().map(|(_, handle)| handle).collect();
    let web = handles.pop().unwrap();
    let mut api = handles.pop().unwrap();

    // The api config was migrated and persisted during load
    assert_eq!(api.items, vec!["server", "client"]);
    assert_eq!(
        dir.read("services/api/project.yaml"),
        "# yaml-language-server: $schema=.schemas/project.json\n# api service\nversion: 1\n\nitems:\n- server\n- client\n"
    );

    // The web config stays under its .yml name
    assert!(web.path().ends_with("project.yml"));
    assert_eq!(web.name.as_deref(), Some("web"));

    api.name = Some("api".into());
    assert_eq!(api.commit().await.unwrap(), CommitOutcome::Written);
    assert_eq!(api.commit().await.unwrap(), CommitOutcome::Unchanged);

    let reloaded = definition
        .init_readonly(&session, dir.join("services/api"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.data(), api.data());
    assert_eq!(reloaded.config_string(), api.config_string());
}

#[tokio::test]
async fn test_blank_name_rejected_on_commit() {
    let dir = setup_workspace();
    let session = ConfigSession::default();

    let mut web = definition()
        .init(&session, dir.join("services/web"))
        .await
        .unwrap()
        .unwrap();
    let before = dir.read("services/web/project.yml");

    web.name = Some("   ".into());
    let err = web.commit().await.unwrap_err();

    assert!(matches!(err, Error::CommitValidation { .. }), "{err}");
    assert_eq!(dir.read("services/web/project.yml"), before);
}

#[tokio::test]
async fn test_new_config_from_default_round_trips() {
    let dir = setup_workspace();
    let session = ConfigSession::from_settings_file(dir.join("confkit.yaml")).unwrap();
    let definition = definition();

    let mut created = definition
        .init_with_default(&session, dir.join("services/new"), || {
            "version: 1\nitems: []\n".to_string()
        })
        .await
        .unwrap();

    assert_eq!(
        created.config_string(),
        "# yaml-language-server: $schema=.schemas/project.json\n\n# Defines project settings\n# Documentation: https://docs.example.com/project.md\nversion: 1\n\nitems: []\n"
    );

    created.items.push("first".into());
    created.commit().await.unwrap();

    let reloaded = definition
        .init_readonly(&session, dir.join("services/new"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.items, vec!["first"]);
    assert!(reloaded.config_string().contains("# Documentation: "));
}
