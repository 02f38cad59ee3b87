//! Sparse field projections over entities and their navigation properties

use chrono::{DateTime, Utc};
use crudkit::core::entity::{Entity, Record};
use crudkit::core::extractors::RequestContext;
use crudkit::core::field::FieldValue;
use crudkit::core::module::EntityFetcher;
use crudkit::core::service::CrudService;
use crudkit::engine::{ProjectedValue, map_to_fields};
use crudkit::entities::Author;
use crudkit::impl_crud_entity;
use crudkit::metadata::Field;
use crudkit::storage::InMemoryStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// A book whose navigation property is named after its target
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
struct Novel {
    id: Uuid,
    name: String,
    author_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<Box<Author>>,
    created_by: Option<Uuid>,
    created_on: DateTime<Utc>,
    updated_by: Option<Uuid>,
    updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(Novel {
    resource: "novel",
    name: "Novel",
    fields: {
        "Name" => name: String,
        "AuthorId" => author_id: Option<Uuid>,
    },
    relations: {
        "Author" => author: Author ["AuthorId"],
    },
});

fn ann() -> Author {
    Author {
        id: Uuid::new_v4(),
        name: "Ann".to_string(),
        email: "ann@example.com".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_null_navigation_property_is_omitted() {
    let novel = Novel {
        name: "Dune".to_string(),
        ..Default::default()
    };

    let projected = map_to_fields(&novel, "Name,Author.Name");
    assert_eq!(serde_json::to_value(&projected).unwrap(), json!({"Name": "Dune"}));
}

#[test]
fn test_nested_field_of_loaded_navigation_property() {
    let author = ann();
    let novel = Novel {
        name: "Dune".to_string(),
        author_id: Some(author.id),
        author: Some(Box::new(author)),
        ..Default::default()
    };

    let projected = map_to_fields(&novel, "Name,Author.Name");
    assert_eq!(
        serde_json::to_value(&projected).unwrap(),
        json!({"Name": "Dune", "Author": {"Name": "Ann"}})
    );
}

#[test]
fn test_round_trip_with_all_own_property_names() {
    let author = ann();
    let all = author.scalar_names().join(",");

    let projected = map_to_fields(&author, &all);
    assert_eq!(projected.len(), Author::schema().fields().len());
    for field in Author::schema().fields() {
        assert_eq!(
            projected.get(field.name()),
            Some(&ProjectedValue::Scalar(field.get(&author))),
            "{}",
            field.name()
        );
    }
}

#[test]
fn test_projection_is_idempotent() {
    let author = ann();
    let novel = Novel {
        name: "Dune".to_string(),
        author: Some(Box::new(author)),
        ..Default::default()
    };

    for fields in ["Name", "name,AUTHOR", "Author.Email,Author.Name,Id", "Missing,Author.Missing"] {
        let once = map_to_fields(&novel, fields);
        let twice = map_to_fields(&once, fields);
        assert_eq!(once, twice, "{fields}");
    }
}

#[test]
fn test_unknown_names_are_skipped() {
    let novel = Novel {
        name: "Dune".to_string(),
        ..Default::default()
    };
    let projected = map_to_fields(&novel, "Nope,Name,,Name.Deeper");
    assert_eq!(projected.keys().collect::<Vec<_>>(), vec!["Name"]);
}

#[test]
fn test_projection_keeps_requested_order() {
    let author = ann();
    let projected = map_to_fields(&author, "Email,Id,Name");
    assert_eq!(projected.keys().collect::<Vec<_>>(), vec!["Email", "Id", "Name"]);
    assert_eq!(
        projected.get("Id"),
        Some(&ProjectedValue::Scalar(FieldValue::Uuid(author.id)))
    );
}

#[tokio::test]
async fn test_service_includes_only_requested_navigation_properties() {
    let authors = InMemoryStore::<Author>::new();
    let novels = InMemoryStore::<Novel>::new();
    let mut fetchers: HashMap<String, Arc<dyn EntityFetcher>> = HashMap::new();
    fetchers.insert("author".to_string(), Arc::new(authors.clone()));
    let service = CrudService::<Novel>::new(Arc::new(novels), Arc::new(fetchers));
    let ctx = RequestContext::default();

    let author_service = CrudService::<Author>::standalone(Arc::new(authors));
    let author_id = author_service.create(&ctx, ann()).await.unwrap();
    let orphan = service
        .create(
            &ctx,
            Novel {
                name: "Orphan".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let linked = service
        .create(
            &ctx,
            Novel {
                name: "Dune".to_string(),
                author_id: Some(author_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let view = service.get_by_id(&ctx, orphan, Some("Name,Author.Name")).await.unwrap();
    assert_eq!(
        serde_json::to_value(view).unwrap(),
        json!({"Id": orphan.to_string(), "Name": "Orphan"})
    );

    let view = service.get_by_id(&ctx, linked, Some("Name,Author.Name")).await.unwrap();
    assert_eq!(
        serde_json::to_value(view).unwrap(),
        json!({"Id": linked.to_string(), "Name": "Dune", "Author": {"Name": "Ann"}})
    );

    let view = service.get_by_id(&ctx, linked, Some("Name")).await.unwrap();
    assert_eq!(
        serde_json::to_value(view).unwrap(),
        json!({"Id": linked.to_string(), "Name": "Dune"})
    );
}

#[test]
fn test_layout_field_list_projects_lookup_text() {
    let layout: Vec<Field> = serde_json::from_value(json!([
        {"FieldName": "Name", "DataType": "string"},
        {"FieldName": "AuthorId", "DataType": "guid", "EntityName": "Author"}
    ]))
    .unwrap();
    let requested = Field::requested_fields(&layout);
    assert_eq!(
        requested,
        vec!["Name", "AuthorId", "AuthorId_Author.Id", "AuthorId_Author.Name"]
    );

    let author = ann();
    let book = crudkit::entities::Books {
        title: "Dune".to_string(),
        author_id: Some(author.id),
        author_id_author: Some(Box::new(author.clone())),
        ..Default::default()
    };
    let projected = map_to_fields(&book, &requested.join(","));
    assert_eq!(
        serde_json::to_value(&projected).unwrap(),
        json!({
            "AuthorId": author.id.to_string(),
            "AuthorId_Author": {"Id": author.id.to_string(), "Name": "Ann"}
        })
    );
}
