//! Tenant entity
//!
//! Tenants are the isolation boundary for every other entity and are not
//! themselves tenant-scoped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::impl_crud_entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Tenant {
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    /// Short unique code, e.g. "ACME"
    #[validate(length(min = 1, max = 20))]
    pub code: String,

    pub is_active: bool,

    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(Tenant {
    resource: "tenant",
    name: "Tenant",
    fields: {
        "Name" => name: String,
        "Code" => code: String,
        "IsActive" => is_active: bool,
    },
    relations: {},
});
