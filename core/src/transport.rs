//! Pluggable HTTP round-trip.
//!
//! The executor only needs "send this `HttpRequest`, give me an
//! `HttpResponse`". `ReqwestTransport` is the default; tests and embedders
//! can supply their own implementation through `SwarmClient::with_transport`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::{SwarmError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip.
///
/// Implementations must return every received status as an `HttpResponse`
/// and reserve `Err` for failures to get a response at all. They must not
/// retry; the executor owns retries and the per-attempt timeout. A request
/// that cannot be sent as given should fail with
/// `TransportError::InvalidRequest` so it is not retried.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, SwarmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SwarmError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one configured with a proxy.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::InvalidRequest(e.to_string())
            } else {
                TransportError::Http(e)
            }
        })?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
