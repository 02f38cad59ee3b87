//! Entity traits defining the core abstraction for all data types

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::core::field::FieldValue;
use crate::core::schema::EntitySchema;

/// A member looked up by name on a [`Record`]
pub enum Member<'a> {
    /// A scalar property value
    Scalar(FieldValue),

    /// A navigation property; `None` when the relation is not loaded or null
    Related(Option<&'a dyn Record>),
}

/// Name-addressable view over a record graph.
///
/// Implemented by every entity and by projections, so the field mapper can
/// walk either one. Name lookups ignore case.
pub trait Record: Send + Sync {
    /// Look up a scalar or related member by name
    fn member(&self, name: &str) -> Option<Member<'_>>;

    /// Names of every scalar member, in declaration order
    fn scalar_names(&self) -> Vec<&str>;
}

/// Base trait for all entities in the system.
///
/// All entities have a UUID id, audit fields and, except for tenants
/// themselves, a tenant id. Implementations are generated by
/// [`impl_crud_entity!`](crate::impl_crud_entity).
pub trait Entity:
    Record + Clone + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    /// The resource name used in URLs (e.g., "author", "userinrole")
    fn resource_name() -> &'static str;

    /// The schema shared by every instance of this entity
    fn schema() -> &'static EntitySchema<Self>;

    // === Core Entity Fields ===

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    fn set_id(&mut self, id: Uuid);

    /// Get the tenant ID for multi-tenant isolation.
    ///
    /// Returns None for entities that are not tenant-scoped.
    fn tenant_id(&self) -> Option<Uuid> {
        None
    }

    /// Assign the owning tenant. No-op for entities that are not tenant-scoped.
    fn assign_tenant(&mut self, _tenant_id: Uuid) {}

    // === Audit ===

    fn stamp_created(&mut self, user: Option<Uuid>, at: DateTime<Utc>);

    fn stamp_updated(&mut self, user: Option<Uuid>, at: DateTime<Utc>);

    /// Copy the creation audit fields from the stored version of this record
    fn carry_created_from(&mut self, stored: &Self);

    // === Utility Methods ===

    /// Drop every loaded navigation property
    fn clear_relations(&mut self) {
        for relation in Self::schema().relations() {
            relation.clear(self);
        }
    }

    /// Whether this record is visible to `tenant`.
    ///
    /// Entities without a tenant id are visible to everyone.
    fn belongs_to(&self, tenant: Uuid) -> bool {
        self.tenant_id().is_none_or(|own| own == tenant)
    }
}
