//! Contract of the platform's collection store.
//!
//! The service only needs to read a collection and replace its metadata
//! mapping. `insert` exists for fixtures and `ping` for readiness checks.

use crate::models::collection::{Collection, CollectionUpdate, NewCollection};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection `{0}` not found")]
    CollectionNotFound(String),
    #[error("collection `{0}` already exists")]
    CollectionAlreadyExists(String),
    #[error("collection handle `{0}` is already taken")]
    HandleTaken(String),
    #[error("collection `{id}` is at version {actual}, expected {expected}")]
    VersionConflict { id: String, expected: i64, actual: i64 },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Fetch a collection by id. Fails with `CollectionNotFound`.
    async fn retrieve(&self, id: &str) -> StoreResult<Collection>;

    /// Replace the metadata mapping and bump the version.
    ///
    /// With `expected_version` set this is a compare-and-set: a mismatch fails
    /// with `VersionConflict` and nothing is written.
    async fn update(&self, id: &str, update: CollectionUpdate) -> StoreResult<Collection>;

    /// Fails with `CollectionAlreadyExists` for a known id and `HandleTaken`
    /// when another collection already uses the handle.
    async fn insert(&self, collection: NewCollection) -> StoreResult<Collection>;

    async fn ping(&self) -> StoreResult<()>;
}
