//! In-memory collection store.
//!
//! Backs tests and local runs without a database. State lives in a `HashMap`
//! behind a `tokio::sync::RwLock`; updates take the write lock, so the version
//! check and the write are atomic within one process.

use super::collection_store::{CollectionStore, StoreError, StoreResult};
use crate::models::collection::{Collection, CollectionUpdate, NewCollection};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryCollectionStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn retrieve(&self, id: &str) -> StoreResult<Collection> {
        self.collections
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::CollectionNotFound(id.to_string()))
    }

    async fn update(&self, id: &str, update: CollectionUpdate) -> StoreResult<Collection> {
        let mut collections = self.collections.write().await;
        let collection = collections
            .get_mut(id)
            .ok_or_else(|| StoreError::CollectionNotFound(id.to_string()))?;

        if let Some(expected) = update.expected_version {
            if collection.version != expected {
                return Err(StoreError::VersionConflict {
                    id: id.to_string(),
                    expected,
                    actual: collection.version,
                });
            }
        }

        collection.metadata = Some(update.metadata);
        collection.version += 1;
        collection.updated_at = Utc::now();
        Ok(collection.clone())
    }

    async fn insert(&self, collection: NewCollection) -> StoreResult<Collection> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(&collection.id) {
            return Err(StoreError::CollectionAlreadyExists(collection.id));
        }
        if collections.values().any(|c| c.handle == collection.handle) {
            return Err(StoreError::HandleTaken(collection.handle));
        }
        let collection = Collection::new(collection, Utc::now());
        collections.insert(collection.id.clone(), collection.clone());
        Ok(collection)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
