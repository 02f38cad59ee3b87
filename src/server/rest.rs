//! REST API exposure
//!
//! Assembles health, entity and metadata routes into one axum `Router` with
//! request tracing and permissive CORS for the admin UI.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::entity_registry::EntityRegistry;
use super::metadata::metadata_routes;
use crate::config::AppConfig;
use crate::metadata::LayoutRepository;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Entity CRUD routes
    /// - Metadata routes
    /// - Custom routes
    pub fn build_router(registry: &EntityRegistry, config: &AppConfig, custom_routes: Vec<Router>) -> Router {
        let entity_routes = registry.build_routes(&config.paging);
        let metadata = metadata_routes(LayoutRepository::from_config(&config.metadata));

        let mut app = Self::health_routes().merge(entity_routes).merge(metadata);
        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME")
        }))
    }
}
