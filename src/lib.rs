//! # crudkit
//!
//! A multi-tenant CRUD backend for admin UIs with a generic listing engine.
//!
//! ## Features
//!
//! - **Generic CRUD**: one `CrudService<T>` and one set of axum handlers serve every entity
//! - **Listing Pipeline**: filter → sort → paginate driven by query parameters
//! - **Sparse Projections**: `?fields=Title,AuthorId_Author.Name` returns only what is asked
//! - **Navigation Properties**: related records are included through entity fetchers
//! - **Tenant Isolation**: records are scoped by the `X-Tenant-ID` header
//! - **JSON Patch**: RFC 6902 documents with case-insensitive paths
//! - **Layout Metadata**: YAML form layouts and menu served to the UI
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crudkit::prelude::*;
//!
//! let config = AppConfig::load()?;
//! ServerBuilder::new(config)
//!     .register_module(AdminModule::new(EntityStores::default()))
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod entities;
pub mod metadata;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Entity, Member, Record},
        field::{FieldKind, FieldValue},
        module::{EntityFetcher, EntityFetchers, Module},
        service::{CrudService, DataStore, RecordView},
    };

    // === Requests ===
    pub use crate::core::{
        extractors::RequestContext,
        patch::PatchDocument,
        query::{FilterCriteria, FilterOperator, ListParams, ListQuery, Page, PageRequest},
    };

    // === Errors ===
    pub use crate::core::error::{
        CrudError, EntityError, ErrorResponse, MetadataError, QueryError, StorageError,
        ValidationError,
    };

    // === Engine ===
    pub use crate::engine::{ProjectedValue, Projection, SortOrder, map_to_fields};

    // === Entities ===
    pub use crate::entities::{
        AdminModule, AppEntity, Author, Books, EntityStores, Role, RoleEntitlement, Tenant, User,
        UserInRole,
    };
    pub use crate::impl_crud_entity;

    // === Configuration, Metadata, Server ===
    pub use crate::config::{AppConfig, PagingConfig};
    pub use crate::metadata::{Field, FileDetails, LayoutRepository};
    pub use crate::server::{CrudDescriptor, EntityDescriptor, EntityRegistry, ServerBuilder};
    pub use crate::storage::InMemoryStore;

    // === External Dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
    pub use validator::Validate;
}
