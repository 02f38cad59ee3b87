//! Axum extractors for the request context
//!
//! Authentication is handled upstream; the tenant and acting user arrive as
//! plain headers and are only parsed here.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::core::error::{CrudError, ValidationError};

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";

/// Tenant and user the request acts on behalf of
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl RequestContext {
    pub fn new(tenant_id: Option<Uuid>, user_id: Option<Uuid>) -> Self {
        Self { tenant_id, user_id }
    }

    /// Context for a tenant with no acting user
    pub fn tenant(tenant_id: Uuid) -> Self {
        Self::new(Some(tenant_id), None)
    }

    /// Parse the context from request headers
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ValidationError> {
        Ok(Self {
            tenant_id: uuid_header(headers, TENANT_HEADER)?,
            user_id: uuid_header(headers, USER_HEADER)?,
        })
    }
}

fn uuid_header(headers: &HeaderMap, name: &str) -> Result<Option<Uuid>, ValidationError> {
    let Some(raw) = headers.get(name) else {
        return Ok(None);
    };
    let text = raw.to_str().map_err(|e| ValidationError::InvalidHeader {
        header: name.to_string(),
        message: e.to_string(),
    })?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(text.trim())
        .map(Some)
        .map_err(|e| ValidationError::InvalidHeader {
            header: name.to_string(),
            message: e.to_string(),
        })
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = CrudError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers)?)
    }
}
