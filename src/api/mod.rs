pub mod routes;
pub mod errors;

use std::collections::HashMap;
use std::sync::Arc;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::config::{ExemptorConfig, Settings};
use crate::db::Database;
use crate::errors::ExemptorError;
use crate::exemptions::ExemptionSet;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Settings from the configuration file; the settings store overrides them key by key.
    pub base: Arc<Settings>,
    /// Replaced wholesale when settings change, never mutated in place.
    pub exemptions: Arc<RwLock<Arc<ExemptionSet>>>,
}

impl AppState {
    pub fn new(db: Database, base: Settings) -> Result<Self, ExemptorError> {
        let set = build_exemptions(&base, &db.load_settings()?)?;
        info!(count = set.len(), "Exemptions loaded");
        Ok(Self {
            db,
            base: Arc::new(base),
            exemptions: Arc::new(RwLock::new(Arc::new(set))),
        })
    }

    pub async fn current(&self) -> Arc<ExemptionSet> {
        self.exemptions.read().await.clone()
    }
}

/// Build the set served to clients from file settings overlaid with stored ones.
pub fn build_exemptions(
    base: &Settings,
    stored: &HashMap<String, String>,
) -> Result<ExemptionSet, ExemptorError> {
    let mut effective = base.clone();
    effective.overlay(stored);
    ExemptionSet::from_configuration(&effective)
}

pub async fn create_app_state(
    db_path: &str,
    config: Option<&ExemptorConfig>,
) -> Result<AppState, ExemptorError> {
    let db = Database::new(db_path)?;
    let base = config.map(ExemptorConfig::settings).unwrap_or_default();
    AppState::new(db, base)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/exemptions", get(routes::exemptions::list_exemptions))
        .route("/api/exemptions/evaluate", post(routes::exemptions::evaluate_findings))
        .route(
            "/api/settings",
            get(routes::settings::get_settings).put(routes::settings::update_settings),
        )
        .route("/api/settings/:key", delete(routes::settings::delete_setting))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
