use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Author;
use crate::impl_crud_entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Books {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 10, max = 17))]
    pub isbn: Option<String>,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(range(min = 0))]
    pub page_count: i32,

    pub published_on: Option<DateTime<Utc>>,
    pub author_id: Option<Uuid>,

    #[serde(rename = "authorId_Author", skip_serializing_if = "Option::is_none")]
    pub author_id_author: Option<Box<Author>>,

    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(Books {
    resource: "books",
    name: "Books",
    tenant: tenant_id,
    fields: {
        "Title" => title: String,
        "Isbn" => isbn: Option<String>,
        "Price" => price: f64,
        "PageCount" => page_count: i32,
        "PublishedOn" => published_on: Option<DateTime<Utc>>,
        "AuthorId" => author_id: Option<Uuid>,
    },
    relations: {
        "AuthorId_Author" => author_id_author: Author ["AuthorId"],
    },
});
