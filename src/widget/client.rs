//! HTTP client for the collection details endpoints.

use crate::models::{
    collection::Collection,
    details::{CollectionMarketingDetails, DetailsResponse},
};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// What the edit widget needs from the server.
#[async_trait]
pub trait DetailsClient: Send + Sync {
    async fn fetch_details(&self, collection_id: &str) -> ClientResult<DetailsResponse>;

    async fn save_details(
        &self,
        collection_id: &str,
        details: &CollectionMarketingDetails,
    ) -> ClientResult<Collection>;
}

/// Lets several widgets share one client.
#[async_trait]
impl<T: DetailsClient + ?Sized> DetailsClient for Arc<T> {
    async fn fetch_details(&self, collection_id: &str) -> ClientResult<DetailsResponse> {
        (**self).fetch_details(collection_id).await
    }

    async fn save_details(
        &self,
        collection_id: &str,
        details: &CollectionMarketingDetails,
    ) -> ClientResult<Collection> {
        (**self).save_details(collection_id, details).await
    }
}

#[derive(Clone, Debug)]
pub struct HttpDetailsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpDetailsClient {
    /// Client using the transport's default timeouts.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: Url::parse(base_url)?,
        })
    }

    /// `{base}/admin/custom/collections/{id}/details`, with `id` percent-encoded.
    fn details_url(&self, collection_id: &str) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["admin", "custom", "collections", collection_id, "details"]);
        Ok(url)
    }
}

#[async_trait]
impl DetailsClient for HttpDetailsClient {
    async fn fetch_details(&self, collection_id: &str) -> ClientResult<DetailsResponse> {
        let response = self.http.get(self.details_url(collection_id)?).send().await?;
        Ok(error_for_status(response).await?.json().await?)
    }

    async fn save_details(
        &self,
        collection_id: &str,
        details: &CollectionMarketingDetails,
    ) -> ClientResult<Collection> {
        let response = self
            .http
            .post(self.details_url(collection_id)?)
            .json(details)
            .send()
            .await?;
        Ok(error_for_status(response).await?.json().await?)
    }
}

/// Keep the error body around; the server puts the reason in it.
async fn error_for_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
