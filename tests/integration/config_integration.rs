//! Integration tests for Configuration System

use crate::integration::test_utils::*;
use crudlist::config::{ConfigLoader, ListConfig};
use crudlist::{ListController, ListError};
use tempfile::TempDir;

#[test]
fn test_config_file_drives_controller() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("list.toml");

    std::fs::write(
        &config_file,
        r#"
endpoint = "https://api.example.test/orders"
debounce_ms = 350

[page_size]
initial = 20

[customization]
disable_delete = true

[api]
elements_path = "/items"
pagination_path = "/meta"
total_count_path = "/meta/total"

[scope]
belongs_to = "customers"
relation_id = "12"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.debounce_window().as_millis(), 350);
    assert!(config.customization.disable_delete);
    assert!(!config.customization.disable_pagination);
    assert_eq!(config.api.ids_path, "/data");

    let controller = ListController::builder(config).build().unwrap();
    let query = controller.query();
    assert_eq!(query.page_size, 20);
    assert_eq!(query.scope.unwrap().relation_id, "12");
}

#[test]
fn test_workspace_config_directory() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "endpoint = \"https://api.example.test/tickets\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.endpoint, "https://api.example.test/tickets");
    assert_eq!(config.page_size.initial, 50);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    assert!(ConfigLoader::load_from_file(&missing).is_err());
}

#[test]
fn test_invalid_config_fails_fast() {
    let mut config = ListConfig::default();
    config.page_size.initial = 0;

    let err = ListController::builder(config).build().err().unwrap();
    match err {
        ListError::Configuration(message) => {
            assert!(message.contains("Endpoint"));
            assert!(message.contains("page size"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_custom_response_shape() {
    let transport = ScriptedTransport::auto(|_| {
        Ok(serde_json::json!({
            "items": [{"id": "a-1"}, {"id": "a-2"}],
            "meta": {"current_page": "1", "next_page_url": "", "prev_page_url": null, "total": "2"}
        }))
    });
    let mut config = config();
    config.api.elements_path = "/items".to_string();
    config.api.pagination_path = "/meta".to_string();
    config.api.total_count_path = "/meta/total".to_string();
    let controller = controller(config, transport);

    controller.refresh();
    advance(250).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.elements.len(), 2);
    assert_eq!(snapshot.total_count, Some(2));
    let cursor = snapshot.cursor.unwrap();
    assert_eq!(cursor.next_token, None);
    assert_eq!(cursor.current_page_marker, "1");
}
