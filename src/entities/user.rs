use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Tenant;
use crate::impl_crud_entity;

/// An application user. Authentication itself happens upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "User name is required"))]
    pub user_name: String,

    #[validate(email(message = "Email is not valid"))]
    pub email: String,

    #[validate(length(max = 100))]
    pub first_name: Option<String>,

    #[validate(length(max = 100))]
    pub last_name: Option<String>,

    pub is_active: bool,

    #[serde(rename = "tenantId_Tenant", skip_serializing_if = "Option::is_none")]
    pub tenant_id_tenant: Option<Box<Tenant>>,

    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(User {
    resource: "user",
    name: "User",
    tenant: tenant_id,
    fields: {
        "UserName" => user_name: String,
        "Email" => email: String,
        "FirstName" => first_name: Option<String>,
        "LastName" => last_name: Option<String>,
        "IsActive" => is_active: bool,
    },
    relations: {
        "TenantId_Tenant" => tenant_id_tenant: Tenant ["TenantId"],
    },
});
