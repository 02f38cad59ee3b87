use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{AppEntity, Role, Tenant, User};
use crate::impl_crud_entity;

/// CRUD permissions a role holds on an entity type
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleEntitlement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub role_id: Uuid,
    pub entity_id: Uuid,
    pub can_create: bool,
    pub can_read: bool,
    pub can_update: bool,
    pub can_delete: bool,

    #[serde(rename = "tenantId_Tenant", skip_serializing_if = "Option::is_none")]
    pub tenant_id_tenant: Option<Box<Tenant>>,

    #[serde(rename = "roleId_Role", skip_serializing_if = "Option::is_none")]
    pub role_id_role: Option<Box<Role>>,

    #[serde(rename = "entityId_Entity", skip_serializing_if = "Option::is_none")]
    pub entity_id_entity: Option<Box<AppEntity>>,

    #[serde(rename = "createdBy_User", skip_serializing_if = "Option::is_none")]
    pub created_by_user: Option<Box<User>>,

    #[serde(rename = "updatedBy_User", skip_serializing_if = "Option::is_none")]
    pub updated_by_user: Option<Box<User>>,

    pub created_by: Option<Uuid>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl_crud_entity!(RoleEntitlement {
    resource: "roleentitlement",
    name: "RoleEntitlement",
    tenant: tenant_id,
    fields: {
        "RoleId" => role_id: Uuid,
        "EntityId" => entity_id: Uuid,
        "CanCreate" => can_create: bool,
        "CanRead" => can_read: bool,
        "CanUpdate" => can_update: bool,
        "CanDelete" => can_delete: bool,
    },
    relations: {
        "TenantId_Tenant" => tenant_id_tenant: Tenant ["TenantId"],
        "RoleId_Role" => role_id_role: Role ["RoleId"],
        "EntityId_Entity" => entity_id_entity: AppEntity ["EntityId"],
        "CreatedBy_User" => created_by_user: User ["CreatedBy"],
        "UpdatedBy_User" => updated_by_user: User ["UpdatedBy"],
    },
});
