//! Client-side checks for bounty creation.
//!
//! Rules run in a fixed order and the first failure wins; the resulting
//! `SwarmError::Validation` names the offending field. Success yields a
//! `ValidatedBounty` with the closed enums already parsed, so nothing
//! downstream re-checks strings.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::SwarmError;
use crate::types::{BountyType, CreateBountyRequest, Funding, Network, SwarmType, ValidatedBounty};

pub const MAX_DESCRIPTION_CHARS: usize = 2000;
pub const MAX_PROJECT_NAME_CHARS: usize = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// `local@domain.tld` shape: exactly one `@`, no whitespace, a dot in the
/// domain part.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// `https://github.com/<owner>/<repo>...`
pub fn validate_github_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if url.scheme() != "https" || url.host_str() != Some("github.com") {
        return false;
    }
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).count() >= 2)
        .unwrap_or(false)
}

pub fn validate_swarm_type(value: &str) -> bool {
    value.parse::<SwarmType>().is_ok()
}

fn one_of<T>(all: &[T], as_str: fn(&T) -> &'static str) -> String {
    all.iter().map(as_str).collect::<Vec<_>>().join(", ")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Validate a creation request and parse it into a `ValidatedBounty`.
pub fn validate_create_bounty(request: &CreateBountyRequest) -> Result<ValidatedBounty, SwarmError> {
    if request.email.is_empty() {
        return Err(SwarmError::validation("email", "Email is required"));
    }
    if !validate_email(&request.email) {
        return Err(SwarmError::validation("email", "Invalid email format"));
    }

    if request.github_url.is_empty() {
        return Err(SwarmError::validation("githubUrl", "GitHub URL is required"));
    }
    if !validate_github_url(&request.github_url) {
        return Err(SwarmError::validation(
            "githubUrl",
            "Invalid GitHub URL. Must be in format: https://github.com/username/repo",
        ));
    }

    if request.description.trim().is_empty() {
        return Err(SwarmError::validation("description", "Description is required"));
    }
    if request.description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(SwarmError::validation(
            "description",
            format!("Description must be less than {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }

    // serde_json writes NaN and infinities as `null`.
    if !request.bounty_amount.is_finite() {
        return Err(SwarmError::validation(
            "bountyAmount",
            "Bounty amount must be a finite number",
        ));
    }
    if request.bounty_amount <= 0.0 {
        return Err(SwarmError::validation(
            "bountyAmount",
            "Bounty amount must be greater than 0",
        ));
    }

    let swarm_type: SwarmType = request.swarm_type.parse().map_err(|_| {
        SwarmError::validation(
            "swarmType",
            format!(
                "Invalid swarm type. Must be one of: {}",
                one_of(&SwarmType::ALL, SwarmType::as_str)
            ),
        )
    })?;

    let bounty_type = request
        .bounty_type
        .as_deref()
        .map(|raw| {
            raw.parse::<BountyType>().map_err(|_| {
                SwarmError::validation(
                    "bountyType",
                    format!(
                        "Invalid bounty type. Must be one of: {}",
                        one_of(&BountyType::ALL, BountyType::as_str)
                    ),
                )
            })
        })
        .transpose()?;

    let network = request
        .network
        .as_deref()
        .map(|raw| {
            raw.parse::<Network>().map_err(|_| {
                SwarmError::validation(
                    "network",
                    format!(
                        "Invalid network. Must be one of: {}",
                        one_of(&Network::ALL, Network::as_str)
                    ),
                )
            })
        })
        .transpose()?;

    if let Some(name) = &request.project_name {
        if name.chars().count() > MAX_PROJECT_NAME_CHARS {
            return Err(SwarmError::validation(
                "projectName",
                format!("Project name must be less than {MAX_PROJECT_NAME_CHARS} characters"),
            ));
        }
    }

    let funding = match bounty_type {
        None => Funding::Unspecified,
        Some(BountyType::Credits) => Funding::Credits { network },
        Some(bounty_type) => {
            let account = non_empty(request.account.as_deref());
            let tx_hash = non_empty(request.tx_hash.as_deref());
            match (account, tx_hash) {
                (Some(account), Some(tx_hash)) => Funding::OnChain {
                    bounty_type,
                    network,
                    account: account.to_string(),
                    tx_hash: tx_hash.to_string(),
                },
                _ => {
                    return Err(SwarmError::validation(
                        "transaction",
                        "Account and transaction hash are required for non-credits bounties",
                    ))
                }
            }
        }
    };

    Ok(ValidatedBounty {
        email: request.email.clone(),
        github_url: request.github_url.clone(),
        description: request.description.clone(),
        bounty_amount: request.bounty_amount,
        swarm_type,
        project_name: request.project_name.clone(),
        is_auto_integration_kit: request.is_auto_integration_kit,
        funding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateBountyRequest {
        CreateBountyRequest {
            email: "test@example.com".to_string(),
            github_url: "https://github.com/test/repo".to_string(),
            description: "Test bounty description".to_string(),
            bounty_amount: 100.0,
            swarm_type: "find-bugs".to_string(),
            ..Default::default()
        }
    }

    fn failing_field(request: &CreateBountyRequest) -> &'static str {
        validate_create_bounty(request)
            .expect_err("request should be rejected")
            .field()
            .expect("validation error carries a field")
    }

    #[test]
    fn accepts_minimal_request() {
        let bounty = validate_create_bounty(&valid_request()).unwrap();
        assert_eq!(bounty.swarm_type, SwarmType::FindBugs);
        assert_eq!(bounty.funding, Funding::Unspecified);
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("a@b.co"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a b@c.d"));
        assert!(!validate_email("a@@b.c"));
        assert!(!validate_email("@b.c"));

        let mut request = valid_request();
        request.email = String::new();
        let err = validate_create_bounty(&request).unwrap_err();
        assert_eq!(err.field(), Some("email"));
        assert_eq!(err.to_string(), "Email is required");

        request.email = "not-an-email".to_string();
        let err = validate_create_bounty(&request).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[test]
    fn github_url_rules() {
        assert!(validate_github_url("https://github.com/owner/repo"));
        assert!(validate_github_url("https://github.com/owner/repo/tree/main"));
        assert!(!validate_github_url("http://github.com/a/b"));
        assert!(!validate_github_url("https://github.com/a"));
        assert!(!validate_github_url("https://github.com/a/"));
        assert!(!validate_github_url("https://gitlab.com/a/b"));
        assert!(!validate_github_url("https://www.github.com/a/b"));
        assert!(!validate_github_url("github.com/a/b"));
        assert!(!validate_github_url("invalid-url"));

        let mut request = valid_request();
        request.github_url = String::new();
        assert_eq!(failing_field(&request), "githubUrl");
        request.github_url = "http://github.com/a/b".to_string();
        assert_eq!(failing_field(&request), "githubUrl");
    }

    #[test]
    fn description_rules() {
        let mut request = valid_request();
        request.description = "   \n\t".to_string();
        assert_eq!(failing_field(&request), "description");

        request.description = "é".repeat(MAX_DESCRIPTION_CHARS);
        assert!(validate_create_bounty(&request).is_ok());

        request.description.push('x');
        let err = validate_create_bounty(&request).unwrap_err();
        assert_eq!(err.field(), Some("description"));
        assert_eq!(err.to_string(), "Description must be less than 2000 characters");
    }

    #[test]
    fn amount_must_be_positive() {
        for amount in [0.0, -1.0, -0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut request = valid_request();
            request.bounty_amount = amount;
            assert_eq!(failing_field(&request), "bountyAmount", "amount {amount}");
        }
    }

    #[test]
    fn infinite_amount_never_reaches_the_wire() {
        let mut request = valid_request();
        request.bounty_amount = f64::INFINITY;
        let err = validate_create_bounty(&request).unwrap_err();
        assert_eq!(err.to_string(), "Bounty amount must be a finite number");

        request.bounty_amount = 0.0;
        let err = validate_create_bounty(&request).unwrap_err();
        assert_eq!(err.to_string(), "Bounty amount must be greater than 0");
    }

    #[test]
    fn swarm_type_must_be_known() {
        let mut request = valid_request();
        request.swarm_type = "write-tests".to_string();
        let err = validate_create_bounty(&request).unwrap_err();
        assert_eq!(err.field(), Some("swarmType"));
        assert_eq!(
            err.to_string(),
            "Invalid swarm type. Must be one of: document-summarizer, find-bugs, build-feature"
        );
        assert!(validate_swarm_type("build-feature"));
        assert!(!validate_swarm_type(""));
    }

    #[test]
    fn bounty_type_and_network_must_be_known() {
        let mut request = valid_request();
        request.bounty_type = Some("doge".to_string());
        assert_eq!(failing_field(&request), "bountyType");

        request.bounty_type = Some("credits".to_string());
        request.network = Some("polygon".to_string());
        let err = validate_create_bounty(&request).unwrap_err();
        assert_eq!(err.field(), Some("network"));
        assert_eq!(err.to_string(), "Invalid network. Must be one of: mainnet, base, sepolia");
    }

    #[test]
    fn project_name_limit() {
        let mut request = valid_request();
        request.project_name = Some("p".repeat(MAX_PROJECT_NAME_CHARS));
        assert!(validate_create_bounty(&request).is_ok());
        request.project_name = Some("p".repeat(MAX_PROJECT_NAME_CHARS + 1));
        assert_eq!(failing_field(&request), "projectName");
    }

    #[test]
    fn credits_skip_transaction_requirement() {
        let mut request = valid_request();
        request.bounty_type = Some("credits".to_string());
        request.network = Some("mainnet".to_string());
        let bounty = validate_create_bounty(&request).unwrap();
        assert_eq!(
            bounty.funding,
            Funding::Credits {
                network: Some(Network::Mainnet)
            }
        );
    }

    #[test]
    fn on_chain_requires_account_and_tx_hash() {
        let mut request = valid_request();
        request.bounty_type = Some("usdc".to_string());
        request.network = Some("base".to_string());
        assert_eq!(failing_field(&request), "transaction");

        request.account = Some("0x742d35Cc6634C0532925a3b8D084c22ef4E7a76f".to_string());
        assert_eq!(failing_field(&request), "transaction");

        request.tx_hash = Some(String::new());
        assert_eq!(failing_field(&request), "transaction");

        request.tx_hash = Some("0x1234".to_string());
        let bounty = validate_create_bounty(&request).unwrap();
        assert!(matches!(
            bounty.funding,
            Funding::OnChain {
                bounty_type: BountyType::Usdc,
                network: Some(Network::Base),
                ..
            }
        ));
    }

    #[test]
    fn first_failure_wins() {
        let request = CreateBountyRequest {
            email: "bad".to_string(),
            bounty_amount: -5.0,
            swarm_type: "nope".to_string(),
            ..Default::default()
        };
        assert_eq!(failing_field(&request), "email");
    }
}
