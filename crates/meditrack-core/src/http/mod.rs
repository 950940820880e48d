//! HTTP access layer: the single chokepoint for outbound API requests.
//!
//! - attaches `Authorization: Bearer <token>` when client storage holds a token
//! - keeps HTML bodies as raw text (see `body`)
//! - on 401 clears both stored token locations; no redirect, no retry

mod body;
#[cfg(test)]
pub(crate) mod mock;
mod transport;

pub use body::ResponseBody;
pub use transport::{CurlTransport, HttpRequest, Method, RawResponse, Transport, TransportError};

use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::storage::ClientStorage;

/// Normalized response handed to the API layer.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u32,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn json(&self) -> Result<&Value, ApiError> {
        self.body.json()
    }
}

/// Thin client over a `Transport`. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    transport: Arc<dyn Transport>,
    storage: ClientStorage,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        storage: ClientStorage,
    ) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|e| ApiError::network(format!("invalid base URL {base_url:?}: {e}")))?;
        // Url::join replaces the last segment unless the base ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        tracing::debug!("API client initialized with URL: {}", base);
        Ok(Self {
            base,
            transport,
            storage,
        })
    }

    /// Client using the curl transport configured from `cfg`.
    pub fn from_config(cfg: &ClientConfig, storage: ClientStorage) -> Result<Self, ApiError> {
        Self::new(
            &cfg.base_url,
            Arc::new(CurlTransport::from_config(cfg)),
            storage,
        )
    }

    pub fn storage(&self) -> &ClientStorage {
        &self.storage
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Resolve an endpoint path (leading '/' optional) plus query pairs against the base URL.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::network(format!("invalid endpoint path {path:?}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse, ApiError> {
        self.send(Method::Get, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.send(Method::Post, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.send(Method::Put, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::Delete, path, &[], None).await
    }

    /// Perform one request. Non-2xx statuses come back as `ApiError::Status`.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_request(method, path, query, body)?;
        tracing::debug!(method = %method, url = %request.url, "api request");

        let transport = Arc::clone(&self.transport);
        let raw = tokio::task::spawn_blocking(move || transport.execute(&request))
            .await
            .map_err(|e| ApiError::network(format!("request task failed: {e}")))?
            .map_err(|e| ApiError::network(format!("{method} {path}: {e}")))?;

        self.intercept(method, path, raw)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.url(path, query)?;
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        let payload = match body {
            Some(v) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_vec(v)?)
            }
            None => None,
        };
        if let Some(token) = self.storage.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token.trim())));
        }
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body: payload,
        })
    }

    fn intercept(&self, method: Method, path: &str, raw: RawResponse) -> Result<ApiResponse, ApiError> {
        let body = ResponseBody::from_bytes(&raw.body);
        if raw
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
        {
            tracing::warn!(path, "received HTML response from API; check the API URL configuration");
        }

        if raw.status == 401 {
            // Whatever credential we hold is no longer accepted.
            self.storage.clear_tokens();
            tracing::info!(path, "401 from API, cleared stored tokens");
        }

        if !(200..300).contains(&raw.status) {
            return Err(ApiError::Status {
                method: method.to_string(),
                path: path.to_string(),
                status: raw.status,
            });
        }

        Ok(ApiResponse {
            status: raw.status,
            content_type: raw.content_type,
            body,
        })
    }
}
