//! Admin backend server
//!
//! Serves every admin entity under `/api/{resource}` plus the layout metadata
//! routes, backed by in-memory stores seeded with demo data.

use anyhow::Result;
use crudkit::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let module = AdminModule::new(crudkit::entities::seed::demo_stores());
    tracing::info!(
        module = module.name(),
        version = module.version(),
        entities = ?module.entity_types(),
        layouts = %config.metadata.layout_dir.display(),
        "starting admin backend"
    );

    ServerBuilder::new(config)
        .register_module(module)
        .serve()
        .await
}
