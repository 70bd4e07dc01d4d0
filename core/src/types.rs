//! Domain DTOs for the bounty API.
//!
//! # Design
//! Request-side fields that the server treats as closed enums (`swarmType`,
//! `bountyType`, `network`) are kept as raw strings on `CreateBountyRequest`
//! so callers can pass user input straight through; the validator parses
//! them into the typed enums below before anything is sent. Response types
//! mirror the server's JSON keys exactly, including the kebab-case keys of
//! the user listing. On the response side the same values stay strings and
//! every field defaults when absent, so a 2xx body never
//! fails to parse over a status or field this client does not know yet; the
//! `*_kind` accessors give the typed view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Task category of a bounty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwarmType {
    DocumentSummarizer,
    FindBugs,
    BuildFeature,
}

impl SwarmType {
    pub const ALL: [SwarmType; 3] = [
        SwarmType::DocumentSummarizer,
        SwarmType::FindBugs,
        SwarmType::BuildFeature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SwarmType::DocumentSummarizer => "document-summarizer",
            SwarmType::FindBugs => "find-bugs",
            SwarmType::BuildFeature => "build-feature",
        }
    }

    /// Human-facing label.
    pub fn display_name(&self) -> &'static str {
        match self {
            SwarmType::DocumentSummarizer => "Document & Summarize",
            SwarmType::FindBugs => "Find Bugs",
            SwarmType::BuildFeature => "Build a Feature",
        }
    }
}

/// Payment medium funding a bounty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BountyType {
    Usdc,
    Eth,
    Credits,
    Koii,
    Kpl,
    Wkoii,
}

impl BountyType {
    pub const ALL: [BountyType; 6] = [
        BountyType::Usdc,
        BountyType::Eth,
        BountyType::Credits,
        BountyType::Koii,
        BountyType::Kpl,
        BountyType::Wkoii,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BountyType::Usdc => "usdc",
            BountyType::Eth => "eth",
            BountyType::Credits => "credits",
            BountyType::Koii => "koii",
            BountyType::Kpl => "kpl",
            BountyType::Wkoii => "wkoii",
        }
    }
}

/// Chain the funding transaction was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Base,
    Sepolia,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Base, Network::Sepolia];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Base => "base",
            Network::Sepolia => "sepolia",
        }
    }
}

/// Lifecycle status of a bounty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BountyStatus {
    InProgress,
    Assigned,
    Auditing,
    Completed,
    Failed,
}

impl BountyStatus {
    pub const ALL: [BountyStatus; 5] = [
        BountyStatus::InProgress,
        BountyStatus::Assigned,
        BountyStatus::Auditing,
        BountyStatus::Completed,
        BountyStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BountyStatus::InProgress => "in-progress",
            BountyStatus::Assigned => "assigned",
            BountyStatus::Auditing => "auditing",
            BountyStatus::Completed => "completed",
            BountyStatus::Failed => "failed",
        }
    }
}

/// Returned when a string is not one of an enum's wire values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {:?}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! wire_enum_str {
    ($($ty:ty),+ $(,)?) => {$(
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )+};
}

wire_enum_str!(SwarmType, BountyType, Network, BountyStatus);

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Caller-supplied parameters for creating a bounty.
///
/// Leave `bounty_type` unset for the plain variant without funding
/// metadata. Any `bounty_type` other than `credits` also needs `account`
/// and `tx_hash`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBountyRequest {
    pub email: String,
    pub github_url: String,
    pub description: String,
    pub bounty_amount: f64,
    pub swarm_type: String,
    pub project_name: Option<String>,
    pub is_auto_integration_kit: bool,
    pub bounty_type: Option<String>,
    pub network: Option<String>,
    pub account: Option<String>,
    pub tx_hash: Option<String>,
}

/// How a validated bounty is paid for.
#[derive(Debug, Clone, PartialEq)]
pub enum Funding {
    /// No funding metadata was supplied.
    Unspecified,
    /// Paid from the user's platform credits; no on-chain proof needed.
    Credits { network: Option<Network> },
    /// Paid on-chain; the funding account and transaction are mandatory.
    OnChain {
        bounty_type: BountyType,
        network: Option<Network>,
        account: String,
        tx_hash: String,
    },
}

impl Funding {
    pub fn bounty_type(&self) -> Option<BountyType> {
        match self {
            Funding::Unspecified => None,
            Funding::Credits { .. } => Some(BountyType::Credits),
            Funding::OnChain { bounty_type, .. } => Some(*bounty_type),
        }
    }

    pub fn network(&self) -> Option<Network> {
        match self {
            Funding::Unspecified => None,
            Funding::Credits { network } | Funding::OnChain { network, .. } => *network,
        }
    }

    pub fn is_credits(&self) -> bool {
        matches!(self, Funding::Credits { .. })
    }
}

/// A `CreateBountyRequest` that passed every validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBounty {
    pub email: String,
    pub github_url: String,
    pub description: String,
    pub bounty_amount: f64,
    pub swarm_type: SwarmType,
    pub project_name: Option<String>,
    pub is_auto_integration_kit: bool,
    pub funding: Funding,
}

/// JSON body of `POST /api/v1/swarm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBountyPayload {
    pub values: BountyValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub is_credits_bounty: bool,
}

/// Business fields nested under `values` in the creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyValues {
    pub email: String,
    pub github_url: String,
    pub description: String,
    pub bounty_amount: f64,
    pub swarm_type: SwarmType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub is_auto_integration_kit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounty_type: Option<BountyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
}

impl From<ValidatedBounty> for CreateBountyPayload {
    fn from(bounty: ValidatedBounty) -> Self {
        let is_credits_bounty = bounty.funding.is_credits();
        let bounty_type = bounty.funding.bounty_type();
        let network = bounty.funding.network();
        let (account, tx_hash) = match bounty.funding {
            Funding::OnChain { account, tx_hash, .. } => (Some(account), Some(tx_hash)),
            Funding::Unspecified | Funding::Credits { .. } => (None, None),
        };
        CreateBountyPayload {
            values: BountyValues {
                email: bounty.email,
                github_url: bounty.github_url,
                description: bounty.description,
                bounty_amount: bounty.bounty_amount,
                swarm_type: bounty.swarm_type,
                project_name: bounty.project_name,
                is_auto_integration_kit: bounty.is_auto_integration_kit,
                bounty_type,
                network,
            },
            account,
            tx_hash,
            is_credits_bounty,
        }
    }
}

/// Credit accounting returned alongside a freshly created bounty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredits {
    pub current_credits: f64,
    pub charge_amount: f64,
    pub user_created: bool,
}

/// A bounty as returned by the creation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BountyData {
    pub id: String,
    pub project_name: String,
    pub status: String,
    pub github_url: String,
    pub swarm_type: String,
    pub bounty_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounty_type: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_credits: Option<UserCredits>,
}

impl BountyData {
    pub fn status_kind(&self) -> Option<BountyStatus> {
        self.status.parse().ok()
    }

    pub fn swarm_type_kind(&self) -> Option<SwarmType> {
        self.swarm_type.parse().ok()
    }

    pub fn bounty_type_kind(&self) -> Option<BountyType> {
        self.bounty_type.as_deref()?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBountyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BountyData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// One row of a user's bounty listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserBounty {
    pub id: String,
    #[serde(rename = "github-url")]
    pub github_url: String,
    #[serde(rename = "bounty-task")]
    pub bounty_task: String,
    #[serde(rename = "project-name")]
    pub project_name: String,
    pub description: String,
    #[serde(rename = "bounty-amount")]
    pub bounty_amount: f64,
    #[serde(rename = "bounty-type", skip_serializing_if = "Option::is_none")]
    pub bounty_type: Option<String>,
    pub status: String,
    #[serde(rename = "assignedNode")]
    pub assigned_node: serde_json::Value,
    #[serde(rename = "isMyPortal")]
    pub is_my_portal: bool,
}

impl UserBounty {
    pub fn bounty_task_kind(&self) -> Option<SwarmType> {
        self.bounty_task.parse().ok()
    }

    pub fn status_kind(&self) -> Option<BountyStatus> {
        self.status.parse().ok()
    }

    pub fn bounty_type_kind(&self) -> Option<BountyType> {
        self.bounty_type.as_deref()?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBountiesResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<UserBounty>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

/// A decomposed unit of a detailed bounty's work; may nest further.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubTask {
    pub swarm_bounty_id: String,
    pub task_name: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub github_username: Option<String>,
    pub pr_url: Option<String>,
    pub sub_tasks: Vec<SubTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedBounty {
    pub swarm_bounty_id: String,
    pub task_name: String,
    pub swarm_type: String,
    pub nodes: Vec<String>,
    pub status: String,
    pub github_username: Option<String>,
    pub pr_url: Option<String>,
    pub github_profile_picture: Option<String>,
    pub sub_tasks: Vec<SubTask>,
}

impl DetailedBounty {
    pub fn swarm_type_kind(&self) -> Option<SwarmType> {
        self.swarm_type.parse().ok()
    }

    pub fn status_kind(&self) -> Option<BountyStatus> {
        self.status.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BountyDetailsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DetailedBounty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
