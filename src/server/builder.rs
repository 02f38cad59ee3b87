//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::EntityRegistry;
use super::rest::RestExposure;
use crate::config::AppConfig;
use crate::core::module::{EntityFetcher, EntityFetchers, Module};
use anyhow::Result;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(AppConfig::default())
///     .register_module(AdminModule::new(stores))
///     .build();
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    modules: Vec<Arc<dyn Module>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            modules: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Add routes that don't fit the CRUD pattern
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register a module
    ///
    /// Its entities are registered at build time, once the fetchers of
    /// every module are known.
    pub fn register_module(mut self, module: impl Module + 'static) -> Self {
        let module = Arc::new(module);
        tracing::debug!(
            module = module.name(),
            version = module.version(),
            entities = ?module.entity_types(),
            "registered module"
        );
        self.modules.push(module);
        self
    }

    /// Fetchers of every registered module, keyed by resource name
    fn entity_fetchers(&self) -> EntityFetchers {
        let mut fetchers_map: HashMap<String, Arc<dyn EntityFetcher>> = HashMap::new();
        for module in &self.modules {
            for entity_type in module.entity_types() {
                if let Some(fetcher) = module.get_entity_fetcher(entity_type) {
                    fetchers_map.insert(entity_type.to_string(), fetcher);
                }
            }
        }
        Arc::new(fetchers_map)
    }

    /// Build the entity registry with every module's descriptors
    pub fn build_registry(&self) -> EntityRegistry {
        let fetchers = self.entity_fetchers();
        let mut registry = EntityRegistry::new();
        for module in &self.modules {
            module.register_entities(&mut registry, Arc::clone(&fetchers));
        }
        registry
    }

    /// Build the final REST router
    pub fn build(mut self) -> Router {
        let registry = self.build_registry();
        let custom_routes = std::mem::take(&mut self.custom_routes);
        RestExposure::build_router(&registry, &self.config, custom_routes)
    }

    /// Serve the application on the configured address with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::CrudService;
    use crate::entities::Author;
    use crate::server::CrudDescriptor;
    use crate::storage::InMemoryStore;
    use axum_test::TestServer;
    use serde_json::Value;

    // ── Stub Module for testing ──────────────────────────────────────────

    struct StubModule {
        authors: InMemoryStore<Author>,
    }

    impl Module for StubModule {
        fn name(&self) -> &str {
            "stub"
        }

        fn entity_types(&self) -> Vec<&str> {
            vec!["author"]
        }

        fn register_entities(&self, registry: &mut EntityRegistry, fetchers: EntityFetchers) {
            let store = Arc::new(self.authors.clone());
            registry.register(Box::new(CrudDescriptor::new(CrudService::<Author>::new(store, fetchers))));
        }

        fn get_entity_fetcher(&self, entity_type: &str) -> Option<Arc<dyn EntityFetcher>> {
            (entity_type == "author").then(|| Arc::new(self.authors.clone()) as Arc<dyn EntityFetcher>)
        }
    }

    fn stub() -> StubModule {
        StubModule {
            authors: InMemoryStore::new(),
        }
    }

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = ServerBuilder::default();
        assert!(builder.modules.is_empty());
        assert!(builder.custom_routes.is_empty());
    }

    #[test]
    fn test_with_custom_routes_appends_router() {
        let builder = ServerBuilder::default()
            .with_custom_routes(Router::new())
            .with_custom_routes(Router::new());
        assert_eq!(builder.custom_routes.len(), 2);
    }

    #[test]
    fn test_registry_collects_module_entities() {
        let builder = ServerBuilder::default().register_module(stub());
        assert_eq!(builder.build_registry().resources(), vec!["author"]);
        assert!(builder.entity_fetchers().contains_key("author"));
    }

    #[tokio::test]
    async fn test_build_serves_health_and_entities() {
        let app = ServerBuilder::default().register_module(stub()).build();
        let server = TestServer::new(app).expect("Failed to create test server");

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");

        let response = server.get("/api/author").await;
        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_build_with_custom_routes() {
        use axum::routing::get;

        let custom = Router::new().route("/custom", get(|| async { "ok" }));
        let app = ServerBuilder::default().with_custom_routes(custom).build();
        let server = TestServer::new(app).expect("Failed to create test server");

        server.get("/custom").await.assert_text("ok");
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
