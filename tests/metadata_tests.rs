//! Layout and menu metadata endpoints over a temporary layout directory

use axum::http::StatusCode;
use axum_test::TestServer;
use crudkit::prelude::*;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

const BOOK_FORM: &str = r#"
- FieldName: Details
  DataType: section
  Fields:
    - FieldName: Title
      DataType: string
      Label: Title
      Required: true
    - FieldName: AuthorId
      DataType: guid
      EntityName: Author
      TextField: Name
- fieldName: Price
  dataType: number
  column: 6
"#;

const MENU: &str = r#"
- Title: Library
  Items:
    - Title: Books
      Entity: books
"#;

fn create_test_server() -> (TestServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Layout/books/archive")).unwrap();
    fs::write(dir.path().join("Layout/books/form.yaml"), BOOK_FORM).unwrap();
    fs::write(dir.path().join("Layout/books/list.yaml"), "- FieldName: Title\n").unwrap();
    fs::write(dir.path().join("Layout/books/archive/old.yaml"), "[]\n").unwrap();
    fs::write(dir.path().join("Layout/books/broken.yaml"), "- FieldName: [unclosed\n").unwrap();
    fs::create_dir_all(dir.path().join("Menu")).unwrap();
    fs::write(dir.path().join("Menu/Menu.yaml"), MENU).unwrap();

    let mut config = AppConfig::default();
    config.metadata.layout_dir = dir.path().join("Layout");
    config.metadata.menu_file = dir.path().join("Menu/Menu.yaml");

    let app = ServerBuilder::new(config).build();
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, dir)
}

#[tokio::test]
async fn test_menu_is_rendered_as_json() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/meta-data/menu").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!([{"Title": "Library", "Items": [{"Title": "Books", "Entity": "books"}]}])
    );
}

#[tokio::test]
async fn test_layout_omits_null_fields_and_uses_camel_case() {
    let (server, _dir) = create_test_server();

    let response = server
        .get("/api/meta-data/books/layout")
        .add_query_param("fileName", "form")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body[0]["fieldName"], "Details");
    assert_eq!(body[0]["fields"][0], json!({
        "column": 12,
        "dataType": "string",
        "fieldName": "Title",
        "label": "Title",
        "required": true
    }));
    assert_eq!(body[0]["fields"][1]["entityName"], "Author");
    // camelCase keys in the file are accepted too
    assert_eq!(body[1], json!({"column": 6, "dataType": "number", "fieldName": "Price"}));
}

#[tokio::test]
async fn test_layout_file_name_with_extension() {
    let (server, _dir) = create_test_server();

    let response = server
        .get("/api/meta-data/books/layout")
        .add_query_param("fileName", "list.yaml")
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!([{"column": 12, "dataType": "string", "fieldName": "Title"}])
    );
}

#[tokio::test]
async fn test_layout_drives_record_projection() {
    let (_server, dir) = create_test_server();
    let repository = LayoutRepository::new(dir.path().join("Layout"), dir.path().join("Menu/Menu.yaml"));

    let layout = repository.layout("books", Some("form")).await.unwrap();
    assert_eq!(
        Field::requested_fields(&layout),
        vec!["Title", "AuthorId", "AuthorId_Author.Id", "AuthorId_Author.Name", "Price"]
    );
}

#[tokio::test]
async fn test_blank_file_name_is_rejected() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/meta-data/books/layout").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Layout's file name should not be blank"
    );

    let response = server
        .get("/api/meta-data/books/layout")
        .add_query_param("fileName", "  ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_path_traversal_is_rejected() {
    let (server, _dir) = create_test_server();

    for name in ["../../Menu/Menu", "archive/old", "..\\secret"] {
        let response = server
            .get("/api/meta-data/books/layout")
            .add_query_param("fileName", name)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "METADATA_INVALID_NAME", "{name}");
    }

    let response = server.get("/api/meta-data/a..b/layouts").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_layout_file_is_not_found() {
    let (server, _dir) = create_test_server();

    let response = server
        .get("/api/meta-data/books/layout")
        .add_query_param("fileName", "missing")
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], "METADATA_FILE_NOT_FOUND");
}

#[tokio::test]
async fn test_unparseable_layout_is_a_server_error() {
    let (server, _dir) = create_test_server();

    let response = server
        .get("/api/meta-data/books/layout")
        .add_query_param("fileName", "broken")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "METADATA_PARSE_ERROR");
}

#[tokio::test]
async fn test_layouts_lists_files_recursively() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/meta-data/books/layouts").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!([
            {"id": "broken", "name": "broken.yaml", "fileType": "yaml"},
            {"id": "form", "name": "form.yaml", "fileType": "yaml"},
            {"id": "list", "name": "list.yaml", "fileType": "yaml"},
            {"id": "old", "name": "old.yaml", "fileType": "yaml"}
        ])
    );
}

#[tokio::test]
async fn test_layouts_of_unknown_entity() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/meta-data/publishers/layouts").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "The directory does not exist.");
}
