//! Module system for crudkit
//!
//! A module bundles a set of entity types: it registers their routes and
//! exposes a fetcher per type so related records can be loaded without
//! knowing the concrete entity types.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::server::entity_registry::EntityRegistry;

/// Fetchers keyed by entity resource name
pub type EntityFetchers = Arc<HashMap<String, Arc<dyn EntityFetcher>>>;

/// Trait for fetching entities dynamically
///
/// Used by the services to include navigation properties
/// (e.g. `TenantId_Tenant`) from another entity's store.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    /// Fetch an entity by ID and return it as JSON
    ///
    /// # Returns
    /// The entity serialized as JSON, or `None` if it does not exist
    async fn fetch_as_json(&self, entity_id: &Uuid) -> Result<Option<serde_json::Value>>;
}

/// Trait for a microservice module
pub trait Module: Send + Sync {
    /// Unique module name
    fn name(&self) -> &str;

    /// Module version
    fn version(&self) -> &str {
        "1.0.0"
    }

    /// List of entity types managed by this module
    fn entity_types(&self) -> Vec<&str>;

    /// Register entities with the entity registry
    ///
    /// `fetchers` holds the fetchers of every registered module, so services
    /// can include related records owned by other modules.
    fn register_entities(&self, registry: &mut EntityRegistry, fetchers: EntityFetchers);

    /// Get an entity fetcher for a specific entity type
    ///
    /// # Returns
    /// An `EntityFetcher` implementation, or `None` if the entity type is not managed by this module
    fn get_entity_fetcher(&self, entity_type: &str) -> Option<Arc<dyn EntityFetcher>>;
}
