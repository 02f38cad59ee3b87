//! Server module for building HTTP servers with auto-registered routes
//!
//! The `ServerBuilder` registers:
//! - CRUD routes for all entities declared in modules
//! - Layout and menu metadata routes
//! - Health check routes

pub mod builder;
pub mod crud;
pub mod entity_registry;
pub mod metadata;
pub mod rest;

pub use builder::ServerBuilder;
pub use crud::CrudDescriptor;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use rest::RestExposure;
