//! Store trait and the generic CRUD service shared by every entity

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::entity::Entity;
use crate::core::error::{CrudError, EntityError, StorageError, ValidationError};
use crate::core::extractors::RequestContext;
use crate::core::module::EntityFetchers;
use crate::core::patch::PatchDocument;
use crate::core::query::{ListQuery, Page};
use crate::core::schema::RelationDescriptor;
use crate::engine::{self, Projection, ensure_id_field, map_to_fields};

/// Persistence boundary for one entity type
///
/// The store knows nothing about tenants, filters or relations; it holds
/// records and hands out snapshots.
#[async_trait]
pub trait DataStore<T: Entity>: Send + Sync {
    /// Insert a new record. Returns `false` if the id is already taken.
    async fn insert(&self, entity: T) -> Result<bool, StorageError>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>, StorageError>;

    /// Snapshot of all records in store order
    async fn list(&self) -> Result<Vec<T>, StorageError>;

    /// Replace an existing record. Returns `false` if it does not exist.
    async fn update(&self, entity: T) -> Result<bool, StorageError>;

    /// Delete a record. Returns `false` if it does not exist.
    async fn delete(&self, id: &Uuid) -> Result<bool, StorageError>;
}

/// Result of a single-record read
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecordView<T> {
    /// The stored record, no fields requested
    Full(T),
    /// Only the requested fields
    Sparse(Projection),
}

/// CRUD operations for one entity type
///
/// Listing runs the filter → sort → paginate pipeline and then includes every
/// navigation property of the returned page. Single-record reads include only
/// the navigation properties named in the field list.
pub struct CrudService<T: Entity> {
    store: Arc<dyn DataStore<T>>,
    fetchers: EntityFetchers,
}

impl<T: Entity> Clone for CrudService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fetchers: Arc::clone(&self.fetchers),
        }
    }
}

impl<T: Entity> CrudService<T> {
    pub fn new(store: Arc<dyn DataStore<T>>, fetchers: EntityFetchers) -> Self {
        Self { store, fetchers }
    }

    /// A service that never includes related records
    pub fn standalone(store: Arc<dyn DataStore<T>>) -> Self {
        Self::new(store, EntityFetchers::default())
    }

    /// List one page of records visible to `ctx`
    pub async fn list(&self, ctx: &RequestContext, query: &ListQuery) -> Result<Page<T>, CrudError> {
        let records: Vec<T> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|record| visible(ctx, record))
            .collect();
        let scoped = records.len();

        let mut page = engine::run_listing(records, query).map_err(|e| {
            tracing::warn!(entity = T::resource_name(), error = %e, "rejected listing query");
            e
        })?;

        let relations: Vec<&RelationDescriptor<T>> = T::schema().relations().iter().collect();
        for record in &mut page.items {
            self.include(ctx, record, &relations).await?;
        }

        tracing::debug!(
            entity = T::resource_name(),
            scoped,
            total = page.total,
            returned = page.items.len(),
            "listed records"
        );
        Ok(page)
    }

    /// Get a record by id, projected onto `fields` when any are requested
    pub async fn get_by_id(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        fields: Option<&str>,
    ) -> Result<RecordView<T>, CrudError> {
        let mut record = self.find_visible(ctx, id).await?;

        let Some(fields) = fields.filter(|f| !f.trim().is_empty()) else {
            return Ok(RecordView::Full(record));
        };
        let fields = ensure_id_field(fields);

        let schema = T::schema();
        let mut relations: Vec<&RelationDescriptor<T>> = Vec::new();
        for head in engine::projection::head_segments(&fields) {
            if let Some(relation) = schema.relation(head) {
                if !relations.iter().any(|r| std::ptr::eq(*r, relation)) {
                    relations.push(relation);
                }
            }
        }
        self.include(ctx, &mut record, &relations).await?;

        let projection = map_to_fields(&record, &fields);
        tracing::debug!(
            entity = T::resource_name(),
            %id,
            keys = projection.len(),
            "projected record"
        );
        Ok(RecordView::Sparse(projection))
    }

    /// Create a record and return its id
    pub async fn create(&self, ctx: &RequestContext, mut entity: T) -> Result<Uuid, CrudError> {
        if entity.id().is_nil() {
            entity.set_id(Uuid::new_v4());
        }
        if let Some(tenant) = ctx.tenant_id {
            entity.assign_tenant(tenant);
        }
        entity.stamp_created(ctx.user_id, Utc::now());
        entity.clear_relations();
        entity.validate()?;
        self.check_references(ctx, &entity).await?;

        let id = entity.id();
        if !self.store.insert(entity).await? {
            return Err(EntityError::AlreadyExists {
                entity_type: T::resource_name().to_string(),
                id,
            }
            .into());
        }

        tracing::info!(entity = T::resource_name(), %id, "created record");
        Ok(id)
    }

    /// Replace a record. The body id must match `id`.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, mut entity: T) -> Result<(), CrudError> {
        if entity.id() != id {
            return Err(ValidationError::MismatchedId {
                path: id,
                body: entity.id(),
            }
            .into());
        }
        let stored = self.find_visible(ctx, id).await?;

        entity.carry_created_from(&stored);
        if let Some(tenant) = ctx.tenant_id.or(stored.tenant_id()) {
            entity.assign_tenant(tenant);
        }
        self.save(ctx, entity).await?;

        tracing::info!(entity = T::resource_name(), %id, "updated record");
        Ok(())
    }

    /// Apply a JSON Patch document to a record
    pub async fn patch(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        document: &PatchDocument,
    ) -> Result<(), CrudError> {
        let stored = self.find_visible(ctx, id).await?;

        let mut value = serde_json::to_value(&stored).map_err(|e| EntityError::SerializationError {
            entity_type: T::resource_name().to_string(),
            message: e.to_string(),
        })?;
        document.apply(&mut value)?;
        let mut patched: T = serde_json::from_value(value).map_err(|e| ValidationError::InvalidPayload {
            message: e.to_string(),
        })?;

        patched.set_id(id);
        patched.carry_created_from(&stored);
        if let Some(tenant) = stored.tenant_id() {
            patched.assign_tenant(tenant);
        }
        self.save(ctx, patched).await?;

        tracing::info!(
            entity = T::resource_name(),
            %id,
            operations = document.0.len(),
            "patched record"
        );
        Ok(())
    }

    /// Delete a record
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), CrudError> {
        self.find_visible(ctx, id).await?;
        if !self.store.delete(&id).await? {
            return Err(EntityError::not_found(T::resource_name(), id).into());
        }

        tracing::info!(entity = T::resource_name(), %id, "deleted record");
        Ok(())
    }

    async fn save(&self, ctx: &RequestContext, mut entity: T) -> Result<(), CrudError> {
        entity.stamp_updated(ctx.user_id, Utc::now());
        entity.clear_relations();
        entity.validate()?;
        self.check_references(ctx, &entity).await?;

        let id = entity.id();
        if !self.store.update(entity).await? {
            return Err(EntityError::not_found(T::resource_name(), id).into());
        }
        Ok(())
    }

    async fn find_visible(&self, ctx: &RequestContext, id: Uuid) -> Result<T, CrudError> {
        self.store
            .get(&id)
            .await?
            .filter(|record| visible(ctx, record))
            .ok_or_else(|| EntityError::not_found(T::resource_name(), id).into())
    }

    /// Load the given navigation properties through the registered fetchers.
    /// Related records of another tenant are left out.
    async fn include(
        &self,
        ctx: &RequestContext,
        record: &mut T,
        relations: &[&RelationDescriptor<T>],
    ) -> Result<(), CrudError> {
        for &relation in relations {
            let Some(related_id) = foreign_key::<T>(relation, record) else {
                continue;
            };
            let Some(json) = self.fetch_related(relation, related_id).await? else {
                continue;
            };
            if !related_visible(ctx, &json) {
                tracing::debug!(
                    entity = T::resource_name(),
                    relation = relation.name(),
                    %related_id,
                    "skipped related record of another tenant"
                );
                continue;
            }
            relation
                .attach(record, json)
                .map_err(|e| EntityError::SerializationError {
                    entity_type: relation.target().to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Reject foreign keys naming a record the context tenant cannot see
    async fn check_references(&self, ctx: &RequestContext, entity: &T) -> Result<(), CrudError> {
        if ctx.tenant_id.is_none() {
            return Ok(());
        }
        for relation in T::schema().relations() {
            // Audit keys are stamped from the acting user
            if matches!(relation.foreign_key(), "CreatedBy" | "UpdatedBy") {
                continue;
            }
            let Some(related_id) = foreign_key(relation, entity) else {
                continue;
            };
            if let Some(json) = self.fetch_related(relation, related_id).await? {
                if !related_visible(ctx, &json) {
                    return Err(ValidationError::ForeignReference {
                        field: relation.foreign_key().to_string(),
                        id: related_id,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    async fn fetch_related(
        &self,
        relation: &RelationDescriptor<T>,
        related_id: Uuid,
    ) -> Result<Option<serde_json::Value>, CrudError> {
        let Some(fetcher) = self.fetchers.get(relation.target()) else {
            tracing::debug!(target_entity = relation.target(), "no fetcher registered");
            return Ok(None);
        };
        Ok(fetcher.fetch_as_json(&related_id).await?)
    }
}

fn foreign_key<T: Entity>(relation: &RelationDescriptor<T>, record: &T) -> Option<Uuid> {
    T::schema()
        .field(relation.foreign_key())
        .and_then(|fk| fk.get(record).as_uuid())
}

/// Tenant check on a fetched record; records without a tenant are shared
fn related_visible(ctx: &RequestContext, json: &serde_json::Value) -> bool {
    let Some(tenant) = ctx.tenant_id else {
        return true;
    };
    match json.get("tenantId") {
        None | Some(serde_json::Value::Null) => true,
        Some(own) => own.as_str().and_then(|raw| Uuid::parse_str(raw).ok()) == Some(tenant),
    }
}

fn visible<T: Entity>(ctx: &RequestContext, record: &T) -> bool {
    ctx.tenant_id.is_none_or(|tenant| record.belongs_to(tenant))
}
