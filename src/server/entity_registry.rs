//! Entity registry for managing entity descriptors and auto-generating CRUD routes

use axum::Router;
use std::collections::BTreeMap;

use crate::config::PagingConfig;

/// Trait that describes how to build routes for an entity
///
/// Each entity (Author, Books, Tenant, etc.) gets one descriptor providing
/// its CRUD routes under `/api/{resource}`.
pub trait EntityDescriptor: Send + Sync {
    /// The resource name used in routes (e.g. "author")
    fn resource(&self) -> &str;

    /// Build the CRUD routes for this entity
    ///
    /// Should return a Router with routes like:
    /// - GET/POST /api/{resource}
    /// - GET/PUT/PATCH/DELETE /api/{resource}/{id}
    fn build_routes(&self, paging: &PagingConfig) -> Router;
}

/// Registry for all entities in the application
///
/// This registry collects entity descriptors from all registered modules
/// and can generate a router with all CRUD routes.
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register an entity descriptor
    ///
    /// The resource name is used as the key.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let resource = descriptor.resource().to_string();
        self.descriptors.insert(resource, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self, paging: &PagingConfig) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes(paging))
            })
    }

    /// Get all registered resource names, sorted
    pub fn resources(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
