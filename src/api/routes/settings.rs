use std::collections::HashMap;
use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use crate::api::{build_exemptions, AppState};
use crate::db::setting_key;
use crate::errors::ExemptorError;

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Value>, ExemptorError> {
    state.db.get_all_settings().map(Json)
}

/// Store the given settings. The resulting exemption set is built first; if
/// any rule would be invalid nothing is stored.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ExemptorError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ExemptorError::Config("Expected a JSON object of settings".into()))?;

    let mut changes = HashMap::new();
    for (key, value) in obj {
        let key = setting_key(key)?;
        let value_str = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if changes.insert(key.to_string(), value_str).is_some() {
            return Err(ExemptorError::Config(format!("Setting '{}' given more than once", key)));
        }
    }

    // Holding the write lock serializes concurrent updates.
    let mut current = state.exemptions.write().await;

    let mut candidate = state.db.load_settings()?;
    candidate.extend(changes.clone());
    let set = build_exemptions(&state.base, &candidate)?;

    state.db.set_settings(&changes)?;
    info!(updated = changes.len(), exemptions = set.len(), "Settings updated");
    let count = set.len();
    *current = Arc::new(set);

    Ok(Json(json!({"updated": changes.len(), "exemptions": count})))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let key = setting_key(&key).map_err(into_error_response)?.to_string();
    let mut current = state.exemptions.write().await;

    let mut candidate = state.db.load_settings().map_err(into_error_response)?;
    if candidate.remove(&key).is_none() {
        return Err((StatusCode::NOT_FOUND, Json(json!({"error": "Setting not found"}))));
    }
    let set = build_exemptions(&state.base, &candidate).map_err(into_error_response)?;

    state.db.delete_setting(&key).map_err(into_error_response)?;
    info!(key = %key, exemptions = set.len(), "Setting deleted");
    *current = Arc::new(set);

    Ok(Json(json!({"deleted": true})))
}

fn into_error_response(e: ExemptorError) -> (StatusCode, Json<Value>) {
    let status = if e.is_configuration() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({"error": e.to_string()})))
}
