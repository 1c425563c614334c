//! Reqwest transport shared by every remote service.
//!
//! Owns the bearer token, the per-request id and the mapping of transport
//! and status failures onto [`TaskboardError`]. Services only name paths and
//! payload types.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TaskboardResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TaskboardError::Config(format!("Cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(String::from);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> TaskboardResult<T> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> TaskboardResult<T> {
        let body = self.send(Method::GET, path, query, None::<&()>).await?;
        decode(&body)
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> TaskboardResult<T> {
        let body = self.send(Method::POST, path, &[], Some(payload)).await?;
        decode(&body)
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> TaskboardResult<T> {
        let body = self.send(Method::PUT, path, &[], Some(payload)).await?;
        decode(&body)
    }

    /// PUT without a body whose response content is not needed.
    pub async fn put_empty(&self, path: &str) -> TaskboardResult<()> {
        self.send(Method::PUT, path, &[], None::<&()>).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> TaskboardResult<()> {
        self.send(Method::DELETE, path, &[], None::<&()>).await.map(|_| ())
    }

    /// POST whose response carries only an optional `message`.
    pub async fn post_for_message<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> TaskboardResult<Option<String>> {
        let body = self.send(Method::POST, path, &[], Some(payload)).await?;
        Ok(server_message(&body))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Option<&B>,
    ) -> TaskboardResult<Vec<u8>> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("http", %method, path, %request_id);
        async move {
            let mut request: RequestBuilder = self
                .client
                .request(method, self.url(path))
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .header(reqwest::header::ACCEPT, "application/json");
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            if let Some(payload) = payload {
                request = request.json(payload);
            }

            let response = request.send().await.map_err(map_transport_error)?;
            let status = response.status();
            let body = response.bytes().await.map_err(map_transport_error)?;
            if !status.is_success() {
                let err = map_status_error(status, &body);
                tracing::warn!(status = status.as_u16(), error = %err, "Request failed");
                return Err(err);
            }
            tracing::debug!(status = status.as_u16(), bytes = body.len(), "Request succeeded");
            Ok(body.to_vec())
        }
        .instrument(span)
        .await
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> TaskboardResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        TaskboardError::Serialization(format!(
            "Unexpected response ({e}): {}",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> TaskboardError {
    if error.is_timeout() {
        TaskboardError::Network(format!("Request timed out: {error}"))
    } else {
        TaskboardError::Network(error.to_string())
    }
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
    error: Option<String>,
}

/// The `message` (or `error`) field of a JSON body, if there is one.
pub fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<MessageBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty())
}

pub(crate) fn map_status_error(status: StatusCode, body: &[u8]) -> TaskboardError {
    let message = server_message(body).unwrap_or_else(|| body_preview(body));
    TaskboardError::http(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
