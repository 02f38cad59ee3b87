use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{Role, Tenant, User};
use crate::impl_crud_entity;

/// Assignment of a user to a role
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInRole {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,

    #[serde(rename = "tenantId_Tenant", skip_serializing_if = "Option::is_none")]
    pub tenant_id_tenant: Option<Box<Tenant>>,

    #[serde(rename = "userId_User", skip_serializing_if = "Option::is_none")]
    pub user_id_user: Option<Box<User>>,

    #[serde(rename = "roleId_Role", skip_serializing_if = "Option::is_none")]
    pub role_id_role: Option<Box<Role>>,

    #[serde(rename = "createdBy_User", skip_serializing_if = "Option::is_none")]
    pub created_by_user: Option<Box<User>>,

    #[serde(rename = "updatedBy_User", skip_serializing_if = "Option::is_none")]
    pub updated_by_user: Option<Box<User>>,

    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(UserInRole {
    resource: "userinrole",
    name: "UserInRole",
    tenant: tenant_id,
    fields: {
        "UserId" => user_id: Uuid,
        "RoleId" => role_id: Uuid,
    },
    relations: {
        "TenantId_Tenant" => tenant_id_tenant: Tenant ["TenantId"],
        "UserId_User" => user_id_user: User ["UserId"],
        "RoleId_Role" => role_id_role: Role ["RoleId"],
        "CreatedBy_User" => created_by_user: User ["CreatedBy"],
        "UpdatedBy_User" => updated_by_user: User ["UpdatedBy"],
    },
});
