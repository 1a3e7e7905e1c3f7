//! Handle lifecycle across sessions: create, load, edit, reload

use confkit_content::SemanticChange;
use confkit_store::{ConfigDefinition, ConfigSession, Migrations};
use confkit_test_utils::TestDir;
use confkit_test_utils::schemas::{PROJECT, project_schemas, project_v1, rename_key};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

/// Untyped definition: the handle holds the raw document.
fn definition() -> ConfigDefinition<Value> {
    ConfigDefinition::builder(PROJECT)
        .schemas(project_schemas(), project_v1())
        .migrations(Migrations::new().raw(|config| Ok(rename_key(config, "list", "items"))))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_untyped_handle_edits() {
    let dir = TestDir::new();
    dir.write("project.yaml", "version: 1\n# keep me\nitems:\n- a\n");
    let session = ConfigSession::default();

    let mut config = definition().init(&session, dir.root()).await.unwrap().unwrap();
    config["items"] = json!(["a", "b"]);

    let changes = config.pending_changes().unwrap();
    assert_eq!(
        changes.changes,
        vec![SemanticChange::Added {
            path: "items[1]".into(),
            value: json!("b"),
        }]
    );

    config.commit().await.unwrap();
    assert_eq!(
        dir.read("project.yaml"),
        "# yaml-language-server: $schema=.schemas/project.json\nversion: 1\n\n# keep me\nitems:\n- a\n- b\n"
    );
}

#[tokio::test]
async fn test_mutable_handle_released_with_session() {
    let dir = TestDir::new();
    dir.write("project.yaml", "version: 0\nlist: []\n");
    let definition = definition();

    {
        let session = ConfigSession::default();
        let config = definition.init(&session, dir.root()).await.unwrap().unwrap();
        assert_eq!(config["version"], json!(1));
    }

    let session = ConfigSession::default();
    let config = definition.init(&session, dir.root()).await.unwrap().unwrap();
    assert_eq!(config.data(), &json!({"version": 1, "items": []}));
}

#[tokio::test]
async fn test_readonly_into_data() {
    let dir = TestDir::new();
    dir.write("configs/project.yaml", "version: 1\nitems: [x]\n");

    let config = definition()
        .init_readonly(&ConfigSession::default(), dir.join("configs"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(config.dir_path(), dir.join("configs"));
    assert_eq!(config.into_data(), json!({"version": 1, "items": ["x"]}));
}
