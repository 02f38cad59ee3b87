//! Generic CRUD routes shared by every entity

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use super::entity_registry::EntityDescriptor;
use crate::config::PagingConfig;
use crate::core::entity::Entity;
use crate::core::error::{CrudError, ValidationError};
use crate::core::extractors::RequestContext;
use crate::core::patch::PatchDocument;
use crate::core::query::ListParams;
use crate::core::service::{CrudService, RecordView};

/// Header carrying the filtered total of a listing
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Routes `/api/{resource}` and `/api/{resource}/{id}` for one entity type
pub struct CrudDescriptor<T: Entity> {
    service: CrudService<T>,
}

impl<T: Entity> CrudDescriptor<T> {
    pub fn new(service: CrudService<T>) -> Self {
        Self { service }
    }
}

impl<T: Entity> EntityDescriptor for CrudDescriptor<T> {
    fn resource(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self, paging: &PagingConfig) -> Router {
        let state = CrudState {
            service: self.service.clone(),
            paging: Arc::new(paging.clone()),
        };
        let collection = format!("/api/{}", T::resource_name());
        let item = format!("{collection}/{{id}}");

        Router::new()
            .route(&collection, get(list::<T>).post(create::<T>))
            .route(
                &item,
                get(get_by_id::<T>)
                    .put(update::<T>)
                    .patch(patch::<T>)
                    .delete(delete::<T>),
            )
            .with_state(state)
    }
}

/// State handed to the CRUD handlers of one entity
pub struct CrudState<T: Entity> {
    pub service: CrudService<T>,
    pub paging: Arc<PagingConfig>,
}

impl<T: Entity> Clone for CrudState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            paging: Arc::clone(&self.paging),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FieldsParams {
    pub fields: Option<String>,
}

fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ValidationError> {
    body.map(|Json(entity)| entity)
        .map_err(|rejection| ValidationError::InvalidPayload {
            message: rejection.body_text(),
        })
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ValidationError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ValidationError::InvalidQuery {
            message: rejection.body_text(),
        })
}

fn record_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ValidationError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ValidationError::InvalidId {
            message: rejection.body_text(),
        })
}

fn status_ok() -> Json<Value> {
    Json(json!({ "status": true }))
}

pub async fn list<T: Entity>(
    State(state): State<CrudState<T>>,
    ctx: RequestContext,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, CrudError> {
    let query = query_params(params)?.into_query(&state.paging)?;
    let page = state.service.list(&ctx, &query).await?;
    Ok(([(TOTAL_COUNT_HEADER, page.total.to_string())], Json(page.items)))
}

pub async fn get_by_id<T: Entity>(
    State(state): State<CrudState<T>>,
    ctx: RequestContext,
    id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<FieldsParams>, QueryRejection>,
) -> Result<Json<RecordView<T>>, CrudError> {
    let id = record_id(id)?;
    let params = query_params(params)?;
    let view = state
        .service
        .get_by_id(&ctx, id, params.fields.as_deref())
        .await?;
    Ok(Json(view))
}

pub async fn create<T: Entity>(
    State(state): State<CrudState<T>>,
    ctx: RequestContext,
    body: Result<Json<T>, JsonRejection>,
) -> Result<Json<Value>, CrudError> {
    let entity = payload(body)?;
    let id = state.service.create(&ctx, entity).await?;
    Ok(Json(json!({ "id": id })))
}

pub async fn update<T: Entity>(
    State(state): State<CrudState<T>>,
    ctx: RequestContext,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<T>, JsonRejection>,
) -> Result<Json<Value>, CrudError> {
    let id = record_id(id)?;
    let entity = payload(body)?;
    state.service.update(&ctx, id, entity).await?;
    Ok(status_ok())
}

pub async fn patch<T: Entity>(
    State(state): State<CrudState<T>>,
    ctx: RequestContext,
    id: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> Result<Json<Value>, CrudError> {
    let id = record_id(id)?;
    let document = PatchDocument::from_slice(&body)?;
    state.service.patch(&ctx, id, &document).await?;
    Ok(status_ok())
}

pub async fn delete<T: Entity>(
    State(state): State<CrudState<T>>,
    ctx: RequestContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, CrudError> {
    let id = record_id(id)?;
    state.service.delete(&ctx, id).await?;
    Ok(status_ok())
}
