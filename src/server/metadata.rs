//! Routes serving layout and menu metadata

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::CrudError;
use crate::metadata::{Field, FileDetails, LayoutRepository};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutParams {
    pub file_name: Option<String>,
}

/// Build the `/api/meta-data` routes
pub fn metadata_routes(repository: LayoutRepository) -> Router {
    Router::new()
        .route("/api/meta-data/menu", get(menu))
        .route("/api/meta-data/{entity}/layout", get(layout))
        .route("/api/meta-data/{entity}/layouts", get(layouts))
        .with_state(repository)
}

async fn menu(State(repository): State<LayoutRepository>) -> Result<Json<Value>, CrudError> {
    Ok(Json(repository.menu().await?))
}

async fn layout(
    State(repository): State<LayoutRepository>,
    Path(entity): Path<String>,
    Query(params): Query<LayoutParams>,
) -> Result<Json<Vec<Field>>, CrudError> {
    let fields = repository.layout(&entity, params.file_name.as_deref()).await?;
    Ok(Json(fields))
}

async fn layouts(
    State(repository): State<LayoutRepository>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<FileDetails>>, CrudError> {
    Ok(Json(repository.layouts(&entity).await?))
}
