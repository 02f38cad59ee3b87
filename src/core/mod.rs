//! Core module containing fundamental traits and types for the framework

pub mod entity;
pub mod error;
pub mod extractors;
pub mod field;
pub mod module;
pub mod patch;
pub mod query;
pub mod schema;
pub mod service;

pub use entity::{Entity, Member, Record};
pub use error::{CrudError, EntityError, ErrorResponse, MetadataError, QueryError, StorageError, ValidationError};
pub use extractors::RequestContext;
pub use field::{FieldKind, FieldType, FieldValue};
pub use module::{EntityFetcher, EntityFetchers, Module};
pub use patch::{PatchDocument, PatchOperation};
pub use query::{FilterCriteria, FilterOperator, ListParams, ListQuery, Page, PageRequest};
pub use schema::{EntitySchema, FieldDescriptor, RelationDescriptor};
pub use service::{CrudService, DataStore, RecordView};
