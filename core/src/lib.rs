//! Async client for the Prometheus Swarm bounty API.
//!
//! # Overview
//! Creates bounties and queries them over HTTP + JSON with a bearer token.
//! Inputs are validated before anything is sent; requests run through a
//! bounded retry loop; failures come back as a typed `SwarmError`.
//!
//! # Design
//! - `SwarmClient` holds only an immutable `SdkConfig` and a `Transport`.
//! - Each operation has a `build_*` step (validation + `HttpRequest`, no
//!   I/O) and an async step that executes it, so the wire shape is testable
//!   on its own.
//! - `executor::execute` owns the timeout and retry policy: 429 and
//!   transport failures back off linearly (`retry_delay * attempt`), every
//!   other failure returns immediately.
//! - `Transport` is the seam to the HTTP stack; `ReqwestTransport` is the
//!   default.
//!
//! ```no_run
//! use swarm_core::{CreateBountyRequest, SdkConfig, SwarmClient};
//!
//! # async fn run() -> Result<(), swarm_core::SwarmError> {
//! let client = SwarmClient::new(SdkConfig::from_env()?)?;
//! let created = client
//!     .create_bounty(&CreateBountyRequest {
//!         email: "developer@example.com".to_string(),
//!         github_url: "https://github.com/example/secure-app".to_string(),
//!         description: "Find authentication bypasses".to_string(),
//!         bounty_amount: 50.0,
//!         swarm_type: "find-bugs".to_string(),
//!         bounty_type: Some("credits".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("created: {}", created.success);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::SwarmClient;
pub use config::{ConfigSummary, SdkConfig};
pub use error::{ErrorKind, SwarmError, TransportError};
pub use executor::RetryPolicy;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    BountyData, BountyDetailsResponse, BountyStatus, BountyType, CreateBountyPayload,
    CreateBountyRequest, CreateBountyResponse, DetailedBounty, Funding, Network, SubTask,
    SwarmType, UserBountiesResponse, UserBounty, UserCredits, ValidatedBounty,
};
pub use validate::{validate_create_bounty, validate_email, validate_github_url, validate_swarm_type};
