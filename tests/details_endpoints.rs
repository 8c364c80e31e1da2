mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    COLLECTION_ID, details_uri, get_request, json_request, read_json, router, store_with,
};
use collection_details::routes::routes::app;
use collection_details::services::collection_store::CollectionStore;
use collection_details::services::details_service::DetailsService;
use serde_json::{Value, json};
use tower::ServiceExt;

fn full_payload() -> Value {
    json!({
        "image": { "id": "img_01", "url": "https://cdn.example.com/summer.jpg" },
        "description": "Light linen for warm days.",
        "collection_page_image": { "id": "img_02", "url": "https://cdn.example.com/summer-wide.jpg" },
        "collection_page_heading": "Summer Collection",
        "collection_page_content": "Breathable fabrics, relaxed cuts."
    })
}

async fn stored_metadata(
    store: &collection_details::services::memory_store::InMemoryCollectionStore,
) -> Value {
    let collection = store.retrieve(COLLECTION_ID).await.expect("retrieve");
    collection.metadata.map(Value::Object).unwrap_or(Value::Null)
}

#[tokio::test]
async fn write_then_read_round_trips() {
    let store = store_with(None).await;
    let app = router(store.clone());

    let response = app
        .clone()
        .oneshot(json_request("POST", &details_uri(COLLECTION_ID), full_payload()))
        .await
        .expect("post");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&details_uri(COLLECTION_ID)))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, full_payload());
}

#[tokio::test]
async fn write_returns_updated_collection() {
    let store = store_with(Some(json!({ "foo": "bar" }))).await;
    let response = router(store)
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "description": "x" }),
        ))
        .await
        .expect("post");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ETAG).unwrap(),
        "\"2\""
    );
    let body = read_json(response).await;
    assert_eq!(body["id"], COLLECTION_ID);
    assert_eq!(body["handle"], "summer");
    assert_eq!(body["version"], 2);
    assert_eq!(body["metadata"], json!({ "foo": "bar", "description": "x" }));
}

#[tokio::test]
async fn merge_preserves_sibling_keys() {
    let store = store_with(Some(json!({ "foo": "bar" }))).await;
    let response = router(store.clone())
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "description": "x" }),
        ))
        .await
        .expect("post");
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        stored_metadata(&store).await,
        json!({ "foo": "bar", "description": "x" })
    );
}

#[tokio::test]
async fn partial_write_leaves_other_fields() {
    let store = store_with(Some(json!({
        "description": "old",
        "collection_page_heading": "H"
    })))
    .await;
    let app = router(store.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "description": "new" }),
        ))
        .await
        .expect("post");
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        stored_metadata(&store).await,
        json!({ "description": "new", "collection_page_heading": "H" })
    );

    let body = read_json(app.oneshot(get_request(&details_uri(COLLECTION_ID))).await.unwrap()).await;
    assert_eq!(body["description"], "new");
    assert_eq!(body["collection_page_heading"], "H");
}

#[tokio::test]
async fn corrupt_metadata_reads_as_defaults() {
    let store = store_with(Some(json!({
        "description": 12345,
        "collection_page_heading": "H",
        "foo": "bar"
    })))
    .await;

    let response = router(store)
        .oneshot(get_request(&details_uri(COLLECTION_ID)))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({
            "image": null,
            "description": "",
            "collection_page_image": null,
            "collection_page_heading": "",
            "collection_page_content": ""
        })
    );
}

#[tokio::test]
async fn missing_metadata_reads_as_defaults() {
    let store = store_with(None).await;
    let response = router(store)
        .oneshot(get_request(&details_uri(COLLECTION_ID)))
        .await
        .expect("get");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::ETAG).unwrap(), "\"1\"");
    assert_eq!(
        read_json(response).await,
        json!({
            "image": null,
            "description": "",
            "collection_page_image": null,
            "collection_page_heading": "",
            "collection_page_content": ""
        })
    );
}

#[tokio::test]
async fn malformed_image_is_rejected_without_mutation() {
    let store = store_with(Some(json!({ "foo": "bar" }))).await;
    let response = router(store.clone())
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "image": { "id": "x", "url": "not-a-url" } }),
        ))
        .await
        .expect("post");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["issues"],
        json!([{ "path": "image.url", "message": "invalid url" }])
    );

    assert_eq!(stored_metadata(&store).await, json!({ "foo": "bar" }));
    assert_eq!(store.retrieve(COLLECTION_ID).await.unwrap().version, 1);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let store = store_with(None).await;
    let request = Request::builder()
        .method("POST")
        .uri(details_uri(COLLECTION_ID))
        .body(Body::from("{\"description\": "))
        .unwrap();

    let response = router(store).oneshot(request).await.expect("post");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body.get("issues").is_none());
}

#[tokio::test]
async fn plain_text_body_is_parsed_as_json() {
    let store = store_with(None).await;
    let request = Request::builder()
        .method("POST")
        .uri(details_uri(COLLECTION_ID))
        .header("content-type", "text/plain;charset=UTF-8")
        .body(Body::from(r#"{"collection_page_content":"Hello"}"#))
        .unwrap();

    let response = router(store.clone()).oneshot(request).await.expect("post");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        stored_metadata(&store).await,
        json!({ "collection_page_content": "Hello" })
    );
}

#[tokio::test]
async fn unknown_keys_in_body_are_not_stored() {
    let store = store_with(None).await;
    let response = router(store.clone())
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "description": "x", "featured": true }),
        ))
        .await
        .expect("post");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stored_metadata(&store).await, json!({ "description": "x" }));
}

#[tokio::test]
async fn same_payload_twice_is_idempotent() {
    let store = store_with(Some(json!({ "foo": "bar" }))).await;
    let app = router(store.clone());

    app.clone()
        .oneshot(json_request("POST", &details_uri(COLLECTION_ID), full_payload()))
        .await
        .expect("first");
    let after_first = stored_metadata(&store).await;

    app.oneshot(json_request("POST", &details_uri(COLLECTION_ID), full_payload()))
        .await
        .expect("second");
    assert_eq!(stored_metadata(&store).await, after_first);
}

#[tokio::test]
async fn sequential_writes_are_last_write_wins() {
    let store = store_with(None).await;
    let app = router(store.clone());

    // Both writers read version 1; neither sends If-Match.
    let first = app
        .clone()
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "description": "first", "collection_page_heading": "A" }),
        ))
        .await
        .expect("first");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "description": "second" }),
        ))
        .await
        .expect("second");
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(
        stored_metadata(&store).await,
        json!({ "description": "second", "collection_page_heading": "A" })
    );
}

#[tokio::test]
async fn stale_if_match_is_precondition_failed() {
    let store = store_with(None).await;
    let app = router(store.clone());

    let response = app
        .clone()
        .oneshot(get_request(&details_uri(COLLECTION_ID)))
        .await
        .unwrap();
    let etag = response.headers().get(header::ETAG).unwrap().clone();

    let mut fresh = json_request(
        "POST",
        &details_uri(COLLECTION_ID),
        json!({ "description": "first" }),
    );
    fresh.headers_mut().insert(header::IF_MATCH, etag.clone());
    let response = app.clone().oneshot(fresh).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut stale = json_request(
        "POST",
        &details_uri(COLLECTION_ID),
        json!({ "description": "second" }),
    );
    stale.headers_mut().insert(header::IF_MATCH, etag);
    let response = app.oneshot(stale).await.unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);

    assert_eq!(stored_metadata(&store).await, json!({ "description": "first" }));
}

#[tokio::test]
async fn required_if_match_without_header_is_428() {
    let store = store_with(None).await;
    let app = app(DetailsService::new(store).with_require_if_match(true));

    let response = app
        .oneshot(json_request(
            "POST",
            &details_uri(COLLECTION_ID),
            json!({ "description": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
}

#[tokio::test]
async fn required_if_match_accepts_wildcard() {
    let store = store_with(Some(json!({ "collection_page_heading": "H" }))).await;
    let app = app(DetailsService::new(store.clone()).with_require_if_match(true));

    let mut request = json_request(
        "POST",
        &details_uri(COLLECTION_ID),
        json!({ "description": "x" }),
    );
    request
        .headers_mut()
        .insert(header::IF_MATCH, header::HeaderValue::from_static("*"));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::ETAG).unwrap(), "\"2\"");

    assert_eq!(
        stored_metadata(&store).await,
        json!({ "description": "x", "collection_page_heading": "H" })
    );
}

#[tokio::test]
async fn unknown_collection_is_not_found() {
    let store = store_with(None).await;
    let app = router(store);

    let response = app
        .clone()
        .oneshot(get_request(&details_uri("pcol_missing")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json(response).await["error"],
        "collection `pcol_missing` not found"
    );

    let response = app
        .oneshot(json_request(
            "POST",
            &details_uri("pcol_missing"),
            json!({ "description": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoints() {
    let app = router(store_with(None).await);

    let response = app.clone().oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "status": "ok" }));

    let response = app.oneshot(get_request("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["checks"]["store"]["ok"], true);
}
