//! HTTP handlers for the collection details sub-resource.
//!
//! - `GET  /admin/custom/collections/{collection_id}/details`
//! - `POST /admin/custom/collections/{collection_id}/details`
//!
//! Both responses carry the collection version as a quoted `ETag`. A write may
//! send it back in `If-Match` to refuse overwriting a newer version.

use crate::{
    errors::AppError,
    services::details_service::{DetailsService, IfMatch},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

/// `GET .../details` — normalized details, never a validation error.
pub async fn get_details(
    State(service): State<DetailsService>,
    Path(collection_id): Path<String>,
) -> Result<Response, AppError> {
    let found = service.get_details(&collection_id).await?;

    let mut response = Json(found.details).into_response();
    set_etag(response.headers_mut(), found.version);
    Ok(response)
}

/// `POST .../details` — validate and merge, returning the updated collection.
///
/// The body is parsed as JSON whatever its `Content-Type`, since admin
/// clients post it as plain text.
pub async fn update_details(
    State(service): State<DetailsService>,
    Path(collection_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let if_match = parse_if_match(&headers)?;
    let collection = service
        .update_details(&collection_id, &body, if_match)
        .await?;

    let version = collection.version;
    let mut response = Json(collection).into_response();
    set_etag(response.headers_mut(), version);
    Ok(response)
}

fn set_etag(headers: &mut HeaderMap, version: i64) {
    if let Ok(value) = HeaderValue::from_str(&format!("\"{}\"", version)) {
        headers.insert(header::ETAG, value);
    }
}

/// Accepts `"3"`, `W/"3"` and bare `3`. `*` means any version.
fn parse_if_match(headers: &HeaderMap) -> Result<Option<IfMatch>, AppError> {
    let Some(value) = headers.get(header::IF_MATCH) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AppError::bad_request("If-Match header is not valid ASCII"))?
        .trim();
    if raw == "*" {
        return Ok(Some(IfMatch::Any));
    }

    let tag = raw.strip_prefix("W/").unwrap_or(raw).trim_matches('"');
    tag.parse::<i64>()
        .map(|version| Some(IfMatch::Version(version)))
        .map_err(|_| AppError::bad_request(format!("If-Match value `{}` is not a version", raw)))
}
