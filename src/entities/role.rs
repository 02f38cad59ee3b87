use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Tenant, User};
use crate::impl_crud_entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[serde(rename = "tenantId_Tenant", skip_serializing_if = "Option::is_none")]
    pub tenant_id_tenant: Option<Box<Tenant>>,

    #[serde(rename = "createdBy_User", skip_serializing_if = "Option::is_none")]
    pub created_by_user: Option<Box<User>>,

    #[serde(rename = "updatedBy_User", skip_serializing_if = "Option::is_none")]
    pub updated_by_user: Option<Box<User>>,

    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(Role {
    resource: "role",
    name: "Role",
    tenant: tenant_id,
    fields: {
        "Name" => name: String,
        "Description" => description: Option<String>,
    },
    relations: {
        "TenantId_Tenant" => tenant_id_tenant: Tenant ["TenantId"],
        "CreatedBy_User" => created_by_user: User ["CreatedBy"],
        "UpdatedBy_User" => updated_by_user: User ["UpdatedBy"],
    },
});
