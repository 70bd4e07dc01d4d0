use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bounty {
    pub id: String,
    pub email: String,
    pub project_name: String,
    pub github_url: String,
    pub description: String,
    pub bounty_amount: f64,
    pub swarm_type: String,
    pub bounty_type: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateValues {
    pub email: String,
    pub github_url: String,
    pub description: String,
    pub bounty_amount: f64,
    pub swarm_type: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub bounty_type: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub is_auto_integration_kit: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload {
    pub values: CreateValues,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub is_credits_bounty: bool,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub email: String,
}

#[derive(Deserialize)]
pub struct DetailsQuery {
    pub id: String,
    #[serde(rename = "swarmType")]
    pub swarm_type: String,
}

pub type Db = Arc<RwLock<HashMap<String, Bounty>>>;

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    db: Db,
}

type Failure = (StatusCode, Json<Value>);

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Db::default(),
    };
    Router::new()
        .route("/api/v1/swarm", post(create_bounty))
        .route("/api/v1/swarm/user", get(user_bounties))
        .route("/api/v1/swarm/details", get(bounty_details))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "success": false, "error": message })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    let expected = format!("Bearer {}", state.api_key);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(failure(StatusCode::UNAUTHORIZED, "Invalid API key")),
    }
}

async fn create_bounty(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePayload>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers)?;

    let values = payload.values;
    if values.bounty_amount <= 0.0 {
        return Err(failure(StatusCode::BAD_REQUEST, "Bounty amount must be greater than 0"));
    }
    let on_chain = values.bounty_type.is_some() && !payload.is_credits_bounty;
    if on_chain && (payload.account.is_none() || payload.tx_hash.is_none()) {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Transaction hash is required for non-credits bounties",
        ));
    }

    let project_name = values
        .project_name
        .unwrap_or_else(|| values.github_url.rsplit('/').next().unwrap_or_default().to_string());
    let bounty = Bounty {
        id: Uuid::new_v4().to_string(),
        email: values.email,
        project_name,
        github_url: values.github_url,
        description: values.description,
        bounty_amount: values.bounty_amount,
        swarm_type: values.swarm_type,
        bounty_type: values.bounty_type,
        status: "in-progress".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.db.write().await.insert(bounty.id.clone(), bounty.clone());

    let mut data = json!({
        "id": bounty.id,
        "projectName": bounty.project_name,
        "status": bounty.status,
        "githubUrl": bounty.github_url,
        "swarmType": bounty.swarm_type,
        "bountyAmount": bounty.bounty_amount,
        "createdAt": bounty.created_at,
    });
    if let Some(bounty_type) = &bounty.bounty_type {
        data["bountyType"] = json!(bounty_type);
    }
    if payload.is_credits_bounty {
        data["userCredits"] = json!({
            "currentCredits": 1000.0 - bounty.bounty_amount,
            "chargeAmount": bounty.bounty_amount,
            "userCreated": false,
        });
    }
    Ok(Json(json!({ "success": true, "data": data })))
}

async fn user_bounties(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers)?;

    let db = state.db.read().await;
    let mut owned: Vec<&Bounty> = db.values().filter(|b| b.email == query.email).collect();
    owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let data: Vec<Value> = owned
        .into_iter()
        .map(|b| {
            json!({
                "id": b.id,
                "github-url": b.github_url,
                "bounty-task": b.swarm_type,
                "project-name": b.project_name,
                "description": b.description,
                "bounty-amount": b.bounty_amount,
                "bounty-type": b.bounty_type,
                "status": b.status,
                "assignedNode": null,
                "isMyPortal": true,
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "count": data.len(),
        "data": data,
        "email": query.email,
    })))
}

async fn bounty_details(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers)?;

    let db = state.db.read().await;
    let bounty = db
        .get(&query.id)
        .filter(|b| b.swarm_type == query.swarm_type)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Bounty not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "swarmBountyId": bounty.id,
            "taskName": bounty.project_name,
            "swarmType": bounty.swarm_type,
            "nodes": [],
            "status": bounty.status,
            "githubUsername": null,
            "prUrl": null,
            "githubProfilePicture": null,
            "subTasks": [],
        }
    })))
}
