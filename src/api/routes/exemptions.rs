use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::AppState;
use crate::models::VulnerableDependency;
use crate::reporting::{evaluate, Evaluation};

pub async fn list_exemptions(State(state): State<AppState>) -> Json<Value> {
    let set = state.current().await;
    let exemptions: Vec<Value> = set
        .iter()
        .map(|e| json!({"rule": e, "justification": e.justification()}))
        .collect();
    Json(json!({ "count": set.len(), "exemptions": exemptions }))
}

pub async fn evaluate_findings(
    State(state): State<AppState>,
    Json(findings): Json<Vec<VulnerableDependency>>,
) -> Json<Evaluation> {
    let set = state.current().await;
    Json(evaluate(&set, findings))
}
