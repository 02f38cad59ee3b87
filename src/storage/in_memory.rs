//! In-memory implementation of DataStore for testing and development

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::module::EntityFetcher;
use crate::core::service::DataStore;

const BACKEND: &str = "in-memory";

/// In-memory entity store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// records are listed in insertion order.
pub struct InMemoryStore<T> {
    records: Arc<RwLock<IndexMap<Uuid, T>>>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Entity> InMemoryStore<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Create a store holding `records`, in order
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map = records.into_iter().map(|r| (r.id(), r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataStore<T> for InMemoryStore<T> {
    async fn insert(&self, entity: T) -> Result<bool, StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::lock(BACKEND, e))?;

        if records.contains_key(&entity.id()) {
            return Ok(false);
        }
        records.insert(entity.id(), entity);
        Ok(true)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::lock(BACKEND, e))?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|e| StorageError::lock(BACKEND, e))?;

        Ok(records.values().cloned().collect())
    }

    async fn update(&self, entity: T) -> Result<bool, StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::lock(BACKEND, e))?;

        match records.get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StorageError::lock(BACKEND, e))?;

        Ok(records.shift_remove(id).is_some())
    }
}

#[async_trait]
impl<T: Entity> EntityFetcher for InMemoryStore<T> {
    async fn fetch_as_json(&self, entity_id: &Uuid) -> anyhow::Result<Option<serde_json::Value>> {
        let record = DataStore::get(self, entity_id).await?;
        Ok(record.map(serde_json::to_value).transpose()?)
    }
}
