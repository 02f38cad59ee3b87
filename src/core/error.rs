//! Typed error handling for crudkit
//!
//! Errors are grouped by category so handlers can match on them precisely
//! and so every failure maps to a stable HTTP status and error code.
//!
//! # Error Categories
//!
//! - [`EntityError`]: Errors related to entity operations (CRUD)
//! - [`QueryError`]: Unresolvable fields, invalid sort orders and filters
//! - [`ValidationError`]: Errors related to input validation
//! - [`MetadataError`]: Errors related to layout and menu files
//! - [`StorageError`]: Errors related to storage backends
//!
//! # Example
//!
//! ```rust,ignore
//! use crudkit::prelude::*;
//!
//! match service.get_by_id(&ctx, id, None).await {
//!     Ok(view) => println!("Found: {:?}", view),
//!     Err(CrudError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("Entity {} not found", id);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for crudkit
///
/// Each variant contains a more specific error type for that category.
#[derive(Debug, Error)]
pub enum CrudError {
    /// Entity-related errors (CRUD operations)
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Filter, sort and field resolution errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Layout/menu metadata errors
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CrudError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrudError::Entity(e) => e.status_code(),
            CrudError::Query(_) => StatusCode::BAD_REQUEST,
            CrudError::Validation(_) => StatusCode::BAD_REQUEST,
            CrudError::Metadata(e) => e.status_code(),
            CrudError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CrudError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrudError::Entity(e) => e.error_code(),
            CrudError::Query(e) => e.error_code(),
            CrudError::Validation(_) => "VALIDATION_ERROR",
            CrudError::Metadata(e) => e.error_code(),
            CrudError::Storage(_) => "STORAGE_ERROR",
            CrudError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CrudError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            CrudError::Query(QueryError::UnknownField { entity_type, field }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "field": field
                }))
            }
            CrudError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<anyhow::Error> for CrudError {
    fn from(err: anyhow::Error) -> Self {
        CrudError::Internal(err.to_string())
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity was not found
    #[error("No data found! {entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    /// Entity already exists (conflict)
    #[error("{entity_type} with id '{id}' already exists")]
    AlreadyExists { entity_type: String, id: Uuid },

    /// Failed to serialize/deserialize entity
    #[error("Failed to serialize/deserialize {entity_type}: {message}")]
    SerializationError { entity_type: String, message: String },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: Uuid) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
            EntityError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
            EntityError::SerializationError { .. } => "ENTITY_SERIALIZATION_ERROR",
        }
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while building a filter, sort or projection for a request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The named property does not exist on the entity
    #[error("Invalid field '{field}' for {entity_type}")]
    UnknownField { entity_type: String, field: String },

    /// Sort order other than asc/desc
    #[error("Invalid sort order '{value}'. Use 'asc' or 'desc'")]
    InvalidSortOrder { value: String },

    /// Operator not applicable to the property's kind
    #[error("Operator '{operator}' is not supported for {kind} field '{field}'")]
    UnsupportedOperator {
        field: String,
        operator: String,
        kind: String,
    },

    /// Criterion value cannot be coerced to the property's kind
    #[error("Value {value} is not a valid {kind} for field '{field}'")]
    InvalidValue {
        field: String,
        kind: String,
        value: String,
    },
}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::UnknownField { .. } => "QUERY_INVALID_FIELD",
            QueryError::InvalidSortOrder { .. } => "QUERY_INVALID_SORT_ORDER",
            QueryError::UnsupportedOperator { .. } => "QUERY_UNSUPPORTED_OPERATOR",
            QueryError::InvalidValue { .. } => "QUERY_INVALID_VALUE",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Page size invalid.")]
    InvalidPageSize { value: i64 },

    #[error("Page size {value} exceeds the maximum of {max}")]
    PageSizeTooLarge { value: i64, max: i64 },

    #[error("Page mumber invalid.")]
    InvalidPageNumber { value: i64 },

    /// The `filters` query parameter is not a JSON array of criteria
    #[error("Invalid filters: {message}")]
    InvalidFilters { message: String },

    #[error("Mismatched Id")]
    MismatchedId { path: Uuid, body: Uuid },

    #[error("Patch document is missing.")]
    MissingPatchDocument,

    #[error("Invalid patch operation: {message}")]
    InvalidPatch { message: String },

    /// A request header could not be parsed
    #[error("Invalid header '{header}': {message}")]
    InvalidHeader { header: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// The request body is not a valid entity
    #[error("Invalid JSON: {message}")]
    InvalidPayload { message: String },

    /// The query string could not be deserialized
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },

    /// The `{id}` path segment is not a UUID
    #[error("Invalid id: {message}")]
    InvalidId { message: String },

    /// A foreign key names a record of another tenant
    #[error("Invalid reference {field}: {id}")]
    ForeignReference { field: String, id: Uuid },
}

/// A single failed field rule
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldValidationError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for CrudError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CrudError::Validation(errors.into())
    }
}

// =============================================================================
// Metadata Errors
// =============================================================================

/// Errors related to layout and menu metadata files
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Layout's file name should not be blank")]
    BlankFileName,

    /// Entity or file name containing path separators or `..`
    #[error("Invalid metadata name '{name}'")]
    InvalidName { name: String },

    #[error("The directory does not exist.")]
    DirectoryNotFound { path: String },

    #[error("Metadata file '{path}' not found")]
    FileNotFound { path: String },

    #[error("Failed to parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

impl MetadataError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MetadataError::BlankFileName => StatusCode::BAD_REQUEST,
            MetadataError::InvalidName { .. } => StatusCode::BAD_REQUEST,
            MetadataError::DirectoryNotFound { .. } => StatusCode::BAD_REQUEST,
            MetadataError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            MetadataError::Parse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            MetadataError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            MetadataError::BlankFileName => "METADATA_BLANK_FILE_NAME",
            MetadataError::InvalidName { .. } => "METADATA_INVALID_NAME",
            MetadataError::DirectoryNotFound { .. } => "METADATA_DIRECTORY_NOT_FOUND",
            MetadataError::FileNotFound { .. } => "METADATA_FILE_NOT_FOUND",
            MetadataError::Parse { .. } => "METADATA_PARSE_ERROR",
            MetadataError::Io { .. } => "METADATA_IO_ERROR",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// A lock guarding the store was poisoned
    #[error("Lock poisoned in {backend} store: {message}")]
    LockPoisoned { backend: String, message: String },

    /// Serialization/deserialization error
    #[error("{backend} serialization error: {message}")]
    SerializationError { backend: String, message: String },
}

impl StorageError {
    pub fn lock(backend: &str, err: impl std::fmt::Display) -> Self {
        StorageError::LockPoisoned {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}
