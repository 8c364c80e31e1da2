#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use collection_details::models::collection::NewCollection;
use collection_details::routes::routes::app;
use collection_details::services::collection_store::CollectionStore;
use collection_details::services::details_service::DetailsService;
use collection_details::services::memory_store::InMemoryCollectionStore;
use collection_details::services::sqlite_store::SqliteCollectionStore;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

pub const COLLECTION_ID: &str = "pcol_01SUMMER";

pub fn details_uri(collection_id: &str) -> String {
    format!("/admin/custom/collections/{}/details", collection_id)
}

/// A store holding one collection with the given metadata.
pub async fn store_with(metadata: Option<serde_json::Value>) -> Arc<InMemoryCollectionStore> {
    let store = Arc::new(InMemoryCollectionStore::new());
    store
        .insert(seed_collection(metadata))
        .await
        .expect("insert");
    store
}

fn seed_collection(metadata: Option<serde_json::Value>) -> NewCollection {
    NewCollection {
        id: COLLECTION_ID.to_string(),
        title: "Summer".to_string(),
        handle: "summer".to_string(),
        metadata: metadata.map(|m| m.as_object().cloned().expect("object metadata")),
    }
}

/// Same as `store_with`, backed by a migrated in-memory SQLite database.
pub async fn sqlite_store_with(
    metadata: Option<serde_json::Value>,
) -> Arc<SqliteCollectionStore> {
    // One connection: every `:memory:` connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("sqlite pool");
    let store = SqliteCollectionStore::new(Arc::new(pool));
    store.migrate().await.expect("migrate");
    store
        .insert(seed_collection(metadata))
        .await
        .expect("insert");
    Arc::new(store)
}

pub fn router(store: Arc<InMemoryCollectionStore>) -> axum::Router {
    app(DetailsService::new(store))
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}
