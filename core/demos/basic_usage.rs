//! Create two bounties, list them, and fetch the details of the first.
//!
//! ```text
//! PROMETHEUS_API_KEY=... RUST_LOG=swarm_core=debug cargo run -p swarm-core --example basic_usage
//! ```
//!
//! Point `PROMETHEUS_BASE_URL` at a local `mock-server` to run it offline.

use swarm_core::{CreateBountyRequest, ErrorKind, SdkConfig, SwarmClient, SwarmError};
use tracing_subscriber::EnvFilter;

const OWNER: &str = "developer@example.com";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        report(&err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SwarmError> {
    let client = SwarmClient::new(SdkConfig::from_env()?)?;
    println!("{:?}", client.config());

    let credits = CreateBountyRequest {
        email: OWNER.to_string(),
        github_url: "https://github.com/example/secure-app".to_string(),
        description: "Find security vulnerabilities in the authentication system, \
                      focusing on SQL injection and XSS."
            .to_string(),
        bounty_amount: 50.0,
        swarm_type: "find-bugs".to_string(),
        bounty_type: Some("credits".to_string()),
        network: Some("mainnet".to_string()),
        project_name: Some("SecureApp Security Audit".to_string()),
        ..Default::default()
    };
    match client.create_bounty(&credits).await {
        Ok(created) => {
            if let Some(data) = created.data {
                println!("created {} ({})", data.id, data.project_name);
                if let Some(credits) = data.user_credits {
                    println!("  charged {} credits, {} left", credits.charge_amount, credits.current_credits);
                }
            }
        }
        Err(err) => report(&err),
    }

    let funded = CreateBountyRequest {
        email: OWNER.to_string(),
        github_url: "https://github.com/startup/mobile-app".to_string(),
        description: "Implement OAuth 2.0 social login with Google and GitHub.".to_string(),
        bounty_amount: 500.0,
        swarm_type: "build-feature".to_string(),
        bounty_type: Some("usdc".to_string()),
        network: Some("base".to_string()),
        project_name: Some("Mobile App Social Login".to_string()),
        is_auto_integration_kit: true,
        account: Some("0x742d35Cc6634C0532925a3b8D084c22ef4E7a76f".to_string()),
        tx_hash: Some(
            "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef".to_string(),
        ),
        ..Default::default()
    };
    match client.create_bounty(&funded).await {
        Ok(created) => println!("created usdc bounty: {}", created.success),
        Err(err) => report(&err),
    }

    let listed = client.get_user_bounties(OWNER).await?;
    println!("{} bounties for {}", listed.count, listed.email);
    for bounty in &listed.data {
        println!(
            "  {} [{}] {} {}",
            bounty.project_name,
            bounty
                .bounty_task_kind()
                .map_or(bounty.bounty_task.as_str(), |task| task.display_name()),
            bounty.bounty_amount,
            bounty.status,
        );
    }

    if let Some(first) = listed.data.first() {
        let details = client
            .get_bounty_details(&first.id, &first.bounty_task)
            .await?;
        if let Some(detail) = details.data {
            println!("{}: {} nodes, {} subtasks", detail.task_name, detail.nodes.len(), detail.sub_tasks.len());
        }
    }
    Ok(())
}

fn report(err: &SwarmError) {
    match err.kind() {
        ErrorKind::Validation => {
            eprintln!("invalid {}: {err}", err.field().unwrap_or("input"));
        }
        ErrorKind::Authentication => eprintln!("check PROMETHEUS_API_KEY: {err}"),
        ErrorKind::RateLimit => {
            eprintln!("{err} (retry after {}s)", err.retry_after().unwrap_or_default());
        }
        ErrorKind::Network => eprintln!("network: {err}"),
        _ => eprintln!("error: {err}"),
    }
}
