use axum::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "exemptor",
        "version": env!("CARGO_PKG_VERSION"),
        "build": option_env!("GIT_HASH").unwrap_or("dev"),
        "built_at": option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
    }))
}
