//! DetailsService — read and merge-write of the marketing details stored in a
//! collection's metadata.
//!
//! Reads are lenient: stored metadata that does not fit the schema reads as
//! if no details were set. Writes are strict: a body that does not fit is
//! rejected before the store is touched.

use super::collection_store::{CollectionStore, StoreError};
use crate::models::{
    collection::{Collection, CollectionUpdate},
    details::{self, CollectionMarketingDetails, DetailsResponse, ValidationError},
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DetailsError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("an If-Match header is required to update collection details")]
    PreconditionRequired,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DetailsResult<T> = Result<T, DetailsError>;

/// Precondition a write was sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfMatch {
    /// `*`: any current version.
    Any,
    Version(i64),
}

impl IfMatch {
    fn version(self) -> Option<i64> {
        match self {
            IfMatch::Any => None,
            IfMatch::Version(version) => Some(version),
        }
    }
}

/// Normalized details plus the collection version they were read at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDetails {
    pub details: DetailsResponse,
    pub version: i64,
}

#[derive(Clone)]
pub struct DetailsService {
    store: Arc<dyn CollectionStore>,

    /// Reject writes that carry no `If-Match` version.
    require_if_match: bool,
}

impl DetailsService {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            store,
            require_if_match: false,
        }
    }

    pub fn with_require_if_match(mut self, require: bool) -> Self {
        self.require_if_match = require;
        self
    }

    pub fn store(&self) -> &Arc<dyn CollectionStore> {
        &self.store
    }

    /// Fetch a collection and project its metadata onto the details shape.
    ///
    /// Only a missing collection is an error. Absent, empty, or invalid fields
    /// come back as empty strings and `null` images.
    pub async fn get_details(&self, collection_id: &str) -> DetailsResult<VersionedDetails> {
        let collection = self.store.retrieve(collection_id).await?;
        let raw = collection
            .metadata
            .map(Value::Object)
            .unwrap_or_else(|| Value::Object(Default::default()));

        let details = match details::validate(&raw) {
            Ok(details) => details,
            Err(err) => {
                warn!(
                    collection_id,
                    "stored collection details are invalid, reading as unset: {}", err
                );
                CollectionMarketingDetails::default()
            }
        };

        Ok(VersionedDetails {
            details: details.into(),
            version: collection.version,
        })
    }

    /// Validate `body` and merge it into the collection's metadata.
    ///
    /// Without `if_match` the read-merge-write is last-write-wins: a concurrent
    /// writer between the read and the update is silently overwritten for the
    /// keys both touch. With a versioned `if_match` the version is checked up
    /// front and again by the store at update time. `IfMatch::Any` satisfies
    /// `require_if_match` without pinning a version.
    pub async fn update_details(
        &self,
        collection_id: &str,
        body: &[u8],
        if_match: Option<IfMatch>,
    ) -> DetailsResult<Collection> {
        let raw: Value = serde_json::from_slice(body)?;
        let fields = details::validate(&raw)?;

        if if_match.is_none() && self.require_if_match {
            return Err(DetailsError::PreconditionRequired);
        }

        let expected_version = if_match.and_then(IfMatch::version);
        let current = self.store.retrieve(collection_id).await?;
        if let Some(expected) = expected_version {
            if expected != current.version {
                return Err(StoreError::VersionConflict {
                    id: collection_id.to_string(),
                    expected,
                    actual: current.version,
                }
                .into());
            }
        }

        let metadata = fields.merge_into(current.metadata.as_ref());
        debug!(
            collection_id,
            keys = metadata.len(),
            "merging collection details into metadata"
        );

        let updated = self
            .store
            .update(
                collection_id,
                CollectionUpdate {
                    metadata,
                    expected_version,
                },
            )
            .await?;

        info!(
            collection_id,
            version = updated.version,
            "updated collection details"
        );
        Ok(updated)
    }

    pub async fn ping(&self) -> DetailsResult<()> {
        Ok(self.store.ping().await?)
    }
}
