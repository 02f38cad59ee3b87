use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::impl_crud_entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Email is not valid"))]
    pub email: String,

    #[validate(length(max = 2000))]
    pub biography: Option<String>,

    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(Author {
    resource: "author",
    name: "Author",
    tenant: tenant_id,
    fields: {
        "Name" => name: String,
        "Email" => email: String,
        "Biography" => biography: Option<String>,
    },
    relations: {},
});
