//! src/services/fragment_client.rs
//!
//! FragmentClient: one request per operation against the fragments service.
//! Headers come from the caller's `AuthenticatedUser`; responses are decoded
//! into the types in `models`. There is no retry, timeout, or caching here:
//! a failed call is logged and handed back to the caller as a `ClientError`.

use crate::{
    errors::{ClientError, ClientResult},
    models::{
        fragment::{
            DEFAULT_CONTENT_TYPE, ExpandedListEnvelope, Fragment, FragmentContent,
            FragmentEnvelope, FragmentList, IdListEnvelope, same_media_type,
        },
        health::HealthStatus,
        user::AuthenticatedUser,
    },
    routes::endpoints::Endpoints,
};
use bytes::Bytes;
use reqwest::{
    Client, Method, RequestBuilder, Response, Url,
    header::{CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

/// Thin wrapper around a shared `reqwest::Client` and the service endpoints.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct FragmentClient {
    http: Client,
    endpoints: Endpoints,
}

impl FragmentClient {
    /// Create a client with its own HTTP transport.
    pub fn new(endpoints: Endpoints) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(format!("fragments-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Setup)?;
        Ok(Self::with_http_client(http, endpoints))
    }

    /// Create a client on top of an existing transport.
    pub fn with_http_client(http: Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// `GET /`: unauthenticated.
    pub async fn health_check(&self) -> ClientResult<HealthStatus> {
        let url = self.endpoints.health();
        info!("Requesting health check...");

        let health: HealthStatus = self
            .read_json(&url, HeaderMap::new())
            .await
            .inspect_err(|err| report(&Method::GET, &url, err))?;

        debug!(?health, "Got health check");
        Ok(health)
    }

    /// `GET /v1/fragments[?expand=1]`
    pub async fn list_fragments(
        &self,
        user: &dyn AuthenticatedUser,
        expand: bool,
    ) -> ClientResult<FragmentList> {
        let url = self.endpoints.fragments(expand);
        info!(user = user.username(), expand, "Requesting user fragments data...");

        let result = async {
            let headers = user.authorization_headers()?;
            if expand {
                let envelope: ExpandedListEnvelope = self.read_json(&url, headers).await?;
                Ok::<_, ClientError>(FragmentList::Expanded(envelope.fragments))
            } else {
                let envelope: IdListEnvelope = self.read_json(&url, headers).await?;
                Ok(FragmentList::Ids(envelope.fragments))
            }
        }
        .await;

        let list = result.inspect_err(|err| report(&Method::GET, &url, err))?;
        debug!(count = list.len(), "Got user fragments data");
        Ok(list)
    }

    /// `POST /v1/fragments` with the raw payload.
    pub async fn create_fragment(
        &self,
        user: &dyn AuthenticatedUser,
        data: Bytes,
        content_type: &str,
    ) -> ClientResult<Fragment> {
        let url = self.endpoints.fragments(false);
        info!(content_type, size = data.len(), "Posting user fragment data...");

        let fragment = self
            .write(Method::POST, &url, user, data, content_type)
            .await
            .inspect_err(|err| report(&Method::POST, &url, err))?;

        debug!(id = %fragment.id, size = fragment.size, "Got posted fragment data");
        Ok(fragment)
    }

    /// `GET /v1/fragments/{id}`: bytes for images, text otherwise.
    pub async fn get_fragment_by_id(
        &self,
        user: &dyn AuthenticatedUser,
        id: &str,
    ) -> ClientResult<FragmentContent> {
        let url = self.endpoints.fragment(id).inspect_err(|err| reject(id, err))?;
        info!(id, "Requesting user fragment data");

        let result = async {
            let response = self.get(&url, user.authorization_headers()?).await?;
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let data = response.bytes().await?;
            FragmentContent::from_bytes(content_type, data)
        }
        .await;

        let content = result.inspect_err(|err| report(&Method::GET, &url, err))?;
        debug!(id, content_type = %content.content_type, size = content.len(), "Got user fragment data");
        Ok(content)
    }

    /// `GET /v1/fragments/{id}/info`
    pub async fn get_fragment_meta_by_id(
        &self,
        user: &dyn AuthenticatedUser,
        id: &str,
    ) -> ClientResult<Fragment> {
        let url = self.endpoints.fragment_info(id).inspect_err(|err| reject(id, err))?;
        info!(id, "Requesting user fragment metadata");

        let result = async {
            let envelope: FragmentEnvelope =
                self.read_json(&url, user.authorization_headers()?).await?;
            Ok::<_, ClientError>(envelope.fragment)
        }
        .await;

        let fragment = result.inspect_err(|err| report(&Method::GET, &url, err))?;
        debug!(id, ?fragment, "Got user fragment metadata");
        Ok(fragment)
    }

    /// `PUT /v1/fragments/{id}`: replaces the stored payload.
    pub async fn update_fragment(
        &self,
        user: &dyn AuthenticatedUser,
        id: &str,
        data: Bytes,
        content_type: &str,
    ) -> ClientResult<Fragment> {
        let url = self.endpoints.fragment(id).inspect_err(|err| reject(id, err))?;
        info!(id, content_type, size = data.len(), "Updating user fragment data...");

        let fragment = self
            .write(Method::PUT, &url, user, data, content_type)
            .await
            .inspect_err(|err| report(&Method::PUT, &url, err))?;

        debug!(id, size = fragment.size, "Got updated fragment data");
        Ok(fragment)
    }

    /// `DELETE /v1/fragments/{id}`
    pub async fn delete_fragment(&self, user: &dyn AuthenticatedUser, id: &str) -> ClientResult<()> {
        let url = self.endpoints.fragment(id).inspect_err(|err| reject(id, err))?;
        info!(id, "Deleting user fragment...");

        let result = async {
            let request = self
                .http
                .delete(url.clone())
                .headers(user.authorization_headers()?);
            execute(request).await.map(drop)
        }
        .await;

        result.inspect_err(|err| report(&Method::DELETE, &url, err))?;
        debug!(id, "Deleted user fragment");
        Ok(())
    }

    async fn get(&self, url: &Url, headers: HeaderMap) -> ClientResult<Response> {
        execute(self.http.get(url.clone()).headers(headers)).await
    }

    async fn read_json<T: DeserializeOwned>(&self, url: &Url, headers: HeaderMap) -> ClientResult<T> {
        let response = self.get(url, headers).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a payload and decode the fragment metadata the service echoes back.
    async fn write(
        &self,
        method: Method,
        url: &Url,
        user: &dyn AuthenticatedUser,
        data: Bytes,
        content_type: &str,
    ) -> ClientResult<Fragment> {
        let headers = user.write_authorization_headers(content_type)?;
        let request = self.http.request(method, url.clone()).headers(headers).body(data);
        let response = execute(request).await?;
        let body = response.bytes().await?;
        let envelope: FragmentEnvelope = serde_json::from_slice(&body)?;

        if !same_media_type(&envelope.fragment.content_type, content_type) {
            warn!(
                requested = content_type,
                stored = %envelope.fragment.content_type,
                "service stored a different content type"
            );
        }
        Ok(envelope.fragment)
    }
}

/// Send a request once. Non-2xx responses become `Http` errors without
/// touching the body.
async fn execute(request: RequestBuilder) -> ClientResult<Response> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::http(status));
    }
    Ok(response)
}

fn reject(id: &str, err: &ClientError) {
    error!(id, error = %err, "Unable to build fragment url");
}

fn report(method: &Method, url: &Url, err: &ClientError) {
    error!(%method, %url, error = %err, "Unable to call fragments API");
}
