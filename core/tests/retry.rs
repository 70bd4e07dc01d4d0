//! Retry and error-mapping behavior over real HTTP, scripted with wiremock.

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use swarm_core::{ErrorKind, SdkConfig, SwarmClient, SwarmError, TransportError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-api-key";

fn client(base_url: &str) -> SwarmClient {
    let config = SdkConfig::new(API_KEY)
        .base_url(base_url)
        .retry_attempts(3)
        .retry_delay(Duration::from_millis(10))
        .timeout(Duration::from_secs(5));
    SwarmClient::new(config).expect("client")
}

#[tokio::test]
async fn sends_bearer_token_and_encoded_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/swarm/user"))
        .and(query_param("email", "test@example.com"))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "count": 0,
            "email": "test@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listed = client(&server.uri()).get_user_bounties("test@example.com").await.unwrap();
    assert!(listed.success);
    assert_eq!(listed.email, "test@example.com");
}

#[tokio::test]
async fn retries_rate_limit_until_success() {
    let server = MockServer::start().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = attempts.clone();
    Mock::given(method("GET"))
        .and(path("/api/v1/swarm/details"))
        .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
            let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
            if current < 2 {
                ResponseTemplate::new(429).set_body_json(json!({"success": false, "error": "slow down"}))
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "success": true,
                    "data": {
                        "swarmBountyId": "test-id",
                        "taskName": "test-task",
                        "swarmType": "find-bugs",
                        "nodes": [],
                        "status": "in-progress",
                        "githubUsername": "testuser",
                        "prUrl": "",
                        "githubProfilePicture": null,
                        "subTasks": []
                    }
                }))
            }
        })
        .expect(3)
        .mount(&server)
        .await;

    let started = Instant::now();
    let details = client(&server.uri())
        .get_bounty_details("test-id", "find-bugs")
        .await
        .unwrap();

    assert_eq!(details.data.unwrap().task_name, "test-task");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    // 10ms after the first attempt, 20ms after the second.
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn rate_limit_on_every_attempt_surfaces_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "42")
                .set_body_json(json!({"success": false, "error": "Too many requests"})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server.uri()).get_user_bounties("a@b.co").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.retry_after(), Some(42));
    assert_eq!(err.to_string(), "Too many requests");
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/swarm"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = swarm_core::CreateBountyRequest {
        email: "test@example.com".to_string(),
        github_url: "https://github.com/test/repo".to_string(),
        description: "Test bounty description".to_string(),
        bounty_amount: 100.0,
        swarm_type: "find-bugs".to_string(),
        ..Default::default()
    };
    let err = client(&server.uri()).create_bounty(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["values"]["email"], "test@example.com");
    assert_eq!(body["isCreditsBounty"], false);
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"success": false, "error": "Internal server error"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server.uri()).get_user_bounties("a@b.co").await.unwrap_err();
    match err {
        SwarmError::Api {
            message,
            status,
            body,
        } => {
            assert_eq!(message, "Internal server error");
            assert_eq!(status, 500);
            assert_eq!(body["success"], false);
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_exhausts_attempts() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // release the port so that requests fail with ECONNREFUSED

    let err = client(&format!("http://{addr}"))
        .get_user_bounties("a@b.co")
        .await
        .unwrap_err();
    match err {
        SwarmError::Network { message, source } => {
            assert_eq!(message, "Request failed after 3 attempts");
            assert!(matches!(source, Some(TransportError::Http(_))));
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_responses_time_out_per_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = SdkConfig::new(API_KEY)
        .base_url(server.uri())
        .retry_attempts(2)
        .retry_delay(Duration::from_millis(10))
        .timeout(Duration::from_millis(100));
    let client = SwarmClient::new(config).unwrap();

    let started = Instant::now();
    let err = client.get_user_bounties("a@b.co").await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(2));
    match err {
        SwarmError::Network { message, source } => {
            assert_eq!(message, "Request failed after 2 attempts");
            assert!(matches!(source, Some(TransportError::Timeout(_))));
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_header_value_fails_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let config = SdkConfig::new(API_KEY)
        .base_url(server.uri())
        .header("X-Trace", "line\nbreak")
        .retry_attempts(3)
        .retry_delay(Duration::from_secs(1));
    let client = SwarmClient::new(config).unwrap();

    let started = Instant::now();
    let err = client.get_user_bounties("a@b.co").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().starts_with("invalid request:"), "{err}");
    // No backoff sleep happened.
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn unparsable_base_url_fails_without_retrying() {
    let config = SdkConfig::new(API_KEY)
        .base_url("not a url")
        .retry_attempts(3)
        .retry_delay(Duration::from_secs(1));
    let client = SwarmClient::new(config).unwrap();

    let started = Instant::now();
    let err = client
        .get_bounty_details("test-id", "find-bugs")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(started.elapsed() < Duration::from_secs(1));
}
