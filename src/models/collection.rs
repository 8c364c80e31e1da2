//! Represents a product collection as owned by the commerce platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product collection.
///
/// Only `metadata` is ever written by this service; the remaining fields are
/// platform-managed and returned as they are stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Collection {
    /// Platform identifier (e.g. `pcol_01H...`).
    pub id: String,

    /// Display title.
    pub title: String,

    /// URL-safe handle, unique across collections.
    pub handle: String,

    /// Free-form key-value mapping shared by every extension of the platform.
    pub metadata: Option<Map<String, Value>>,

    /// Incremented on every update. Exposed to clients as the ETag.
    pub version: i64,

    /// When this collection was created.
    pub created_at: DateTime<Utc>,

    /// When this collection was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A collection to be inserted, e.g. from a seed file.
#[derive(Deserialize, Clone, Debug)]
pub struct NewCollection {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Patch accepted by the store's update operation.
#[derive(Clone, Debug)]
pub struct CollectionUpdate {
    /// Replacement metadata mapping. Callers merge before building the patch.
    pub metadata: Map<String, Value>,

    /// When set, the update only applies if the stored version matches.
    pub expected_version: Option<i64>,
}

impl Collection {
    pub fn new(new: NewCollection, now: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            title: new.title,
            handle: new.handle,
            metadata: new.metadata,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}
