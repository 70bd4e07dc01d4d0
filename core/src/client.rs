//! Public entry point for the bounty API.
//!
//! # Design
//! `SwarmClient` holds an immutable `SdkConfig` and a shared `Transport`;
//! it has no other state, so one instance can serve concurrent callers.
//! Each operation is split into a `build_*` method that checks its inputs
//! and produces an `HttpRequest` without I/O, and an async method that runs
//! the request through the executor and deserializes the body. Nothing is
//! sent unless `build_*` succeeds.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::config::{ConfigSummary, SdkConfig};
use crate::error::SwarmError;
use crate::executor::{self, RetryPolicy};
use crate::http::{merge_header, HttpMethod, HttpRequest};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    BountyDetailsResponse, CreateBountyPayload, CreateBountyRequest, CreateBountyResponse,
    UserBountiesResponse,
};
use crate::validate::validate_create_bounty;

pub const CREATE_BOUNTY_PATH: &str = "/api/v1/swarm";
pub const USER_BOUNTIES_PATH: &str = "/api/v1/swarm/user";
pub const BOUNTY_DETAILS_PATH: &str = "/api/v1/swarm/details";

/// Async client for the bounty API.
#[derive(Clone)]
pub struct SwarmClient {
    config: SdkConfig,
    transport: Arc<dyn Transport>,
}

impl SwarmClient {
    /// Build a client on the default reqwest transport.
    pub fn new(config: SdkConfig) -> Result<Self, SwarmError> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(config, transport)
    }

    pub fn with_transport(
        config: SdkConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self, SwarmError> {
        if config.api_key.is_empty() {
            return Err(SwarmError::Config("API key is required".to_string()));
        }
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// Effective configuration. Reports only whether a key is set.
    pub fn config(&self) -> ConfigSummary {
        self.config.summary()
    }

    pub fn build_create_bounty(
        &self,
        request: &CreateBountyRequest,
    ) -> Result<HttpRequest, SwarmError> {
        let payload = CreateBountyPayload::from(validate_create_bounty(request)?);
        let body = serde_json::to_string(&payload)
            .map_err(|e| SwarmError::Config(format!("failed to encode request body: {e}")))?;
        Ok(self.request(HttpMethod::Post, CREATE_BOUNTY_PATH.to_string(), Some(body)))
    }

    pub fn build_user_bounties(&self, email: &str) -> Result<HttpRequest, SwarmError> {
        if email.is_empty() {
            return Err(SwarmError::Config("Email is required".to_string()));
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("email", email)
            .finish();
        Ok(self.request(HttpMethod::Get, format!("{USER_BOUNTIES_PATH}?{query}"), None))
    }

    pub fn build_bounty_details(&self, id: &str, swarm_type: &str) -> Result<HttpRequest, SwarmError> {
        if id.is_empty() {
            return Err(SwarmError::Config("Bounty ID is required".to_string()));
        }
        if swarm_type.is_empty() {
            return Err(SwarmError::Config("Swarm type is required".to_string()));
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("id", id)
            .append_pair("swarmType", swarm_type)
            .finish();
        Ok(self.request(HttpMethod::Get, format!("{BOUNTY_DETAILS_PATH}?{query}"), None))
    }

    /// Validate and submit a new bounty.
    pub async fn create_bounty(
        &self,
        request: &CreateBountyRequest,
    ) -> Result<CreateBountyResponse, SwarmError> {
        let request = self.build_create_bounty(request)?;
        self.send(&request).await
    }

    /// All bounties owned by `email`.
    pub async fn get_user_bounties(&self, email: &str) -> Result<UserBountiesResponse, SwarmError> {
        let request = self.build_user_bounties(email)?;
        self.send(&request).await
    }

    /// Detailed view of one bounty, including its subtasks.
    pub async fn get_bounty_details(
        &self,
        id: &str,
        swarm_type: &str,
    ) -> Result<BountyDetailsResponse, SwarmError> {
        let request = self.build_bounty_details(id, swarm_type)?;
        self.send(&request).await
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", self.config.api_key)),
        ];
        for (name, value) in &self.config.headers {
            merge_header(&mut headers, name, value);
        }
        HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url),
            headers,
            body,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, SwarmError> {
        let policy = RetryPolicy::from(&self.config);
        let value = executor::execute(self.transport.as_ref(), &policy, request).await?;
        serde_json::from_value(value).map_err(|e| SwarmError::Deserialization(e.to_string()))
    }
}

impl std::fmt::Debug for SwarmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwarmClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
