//! src/services/sqlite_store.rs
//!
//! SqliteCollectionStore — collection rows kept in SQLite, with the metadata
//! mapping serialized as JSON text in a single column. Stands in for the
//! platform's product module when the service runs on its own.

use super::collection_store::{CollectionStore, StoreError, StoreResult};
use crate::models::collection::{Collection, CollectionUpdate, NewCollection};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use tracing::{debug, warn};

/// Schema applied by `migrate`.
pub const INIT_MIGRATION: &str = include_str!("../../migrations/0001_init.sql");

const SELECT_COLUMNS: &str =
    "SELECT id, title, handle, metadata, version, created_at, updated_at FROM collections";

#[derive(Clone)]
pub struct SqliteCollectionStore {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

#[derive(FromRow)]
struct CollectionRow {
    id: String,
    title: String,
    handle: String,
    metadata: Option<String>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CollectionRow> for Collection {
    type Error = StoreError;

    fn try_from(row: CollectionRow) -> StoreResult<Self> {
        let metadata = row
            .metadata
            .as_deref()
            .and_then(|raw| decode_metadata(&row.id, raw));

        Ok(Collection {
            id: row.id,
            title: row.title,
            handle: row.handle,
            metadata,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The column is written by this store, but anything else with access to the
/// database may put other JSON (or none) there. Such values read as unset.
fn decode_metadata(id: &str, raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            warn!(
                collection_id = id,
                "metadata column holds a JSON {}, ignoring it",
                json_kind(&other)
            );
            None
        }
        Err(err) => {
            warn!(
                collection_id = id,
                "metadata column is not valid JSON, ignoring it: {}", err
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl SqliteCollectionStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Run the embedded schema statements one by one.
    pub async fn migrate(&self) -> StoreResult<()> {
        let statements = INIT_MIGRATION
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        tracing::info!("Running {} migration statements...", statements.len());

        for stmt in statements {
            debug!("Executing migration SQL: {}", stmt);
            sqlx::query(stmt).execute(&*self.db).await?;
        }
        Ok(())
    }

    async fn fetch_row(&self, id: &str) -> StoreResult<Option<CollectionRow>> {
        let row = sqlx::query_as::<_, CollectionRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl CollectionStore for SqliteCollectionStore {
    async fn retrieve(&self, id: &str) -> StoreResult<Collection> {
        self.fetch_row(id)
            .await?
            .ok_or_else(|| StoreError::CollectionNotFound(id.to_string()))?
            .try_into()
    }

    /// Single statement compare-and-set. When no row comes back the collection
    /// is re-read to tell a missing id from a version mismatch.
    async fn update(&self, id: &str, update: CollectionUpdate) -> StoreResult<Collection> {
        let metadata = Value::Object(update.metadata).to_string();
        let row = sqlx::query_as::<_, CollectionRow>(
            r#"
            UPDATE collections
            SET metadata = ?, version = version + 1, updated_at = ?
            WHERE id = ? AND (? IS NULL OR version = ?)
            RETURNING id, title, handle, metadata, version, created_at, updated_at
            "#,
        )
        .bind(&metadata)
        .bind(Utc::now())
        .bind(id)
        .bind(update.expected_version)
        .bind(update.expected_version)
        .fetch_optional(&*self.db)
        .await?;

        if let Some(row) = row {
            debug!("updated metadata of collection {} to version {}", id, row.version);
            return row.try_into();
        }

        match (self.fetch_row(id).await?, update.expected_version) {
            (None, _) => Err(StoreError::CollectionNotFound(id.to_string())),
            (Some(current), Some(expected)) => Err(StoreError::VersionConflict {
                id: id.to_string(),
                expected,
                actual: current.version,
            }),
            // Row exists and no version was requested, yet nothing was updated.
            (Some(_), None) => Err(StoreError::Sqlx(sqlx::Error::RowNotFound)),
        }
    }

    async fn insert(&self, collection: NewCollection) -> StoreResult<Collection> {
        let collection = Collection::new(collection, Utc::now());
        let metadata = collection
            .metadata
            .clone()
            .map(|m| Value::Object(m).to_string());

        match sqlx::query(
            "INSERT INTO collections (id, title, handle, metadata, version, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&collection.id)
        .bind(&collection.title)
        .bind(&collection.handle)
        .bind(metadata)
        .bind(collection.version)
        .bind(collection.created_at)
        .bind(collection.updated_at)
        .execute(&*self.db)
        .await
        {
            Ok(_) => Ok(collection),
            // Both `id` and `handle` are unique; the row on file tells which one hit.
            Err(err) if is_unique_violation(&err) => {
                match self.fetch_row(&collection.id).await? {
                    Some(_) => Err(StoreError::CollectionAlreadyExists(collection.id)),
                    None => Err(StoreError::HandleTaken(collection.handle)),
                }
            }
            Err(err) => Err(StoreError::Sqlx(err)),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        match sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?
        {
            1 => Ok(()),
            _ => Err(StoreError::Sqlx(sqlx::Error::RowNotFound)),
        }
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
