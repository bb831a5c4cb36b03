use crate::cli::commands::ServeArgs;
use crate::cli::load_optional_config;
use crate::errors::ExemptorError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), ExemptorError> {
    info!(host = %args.host, port = args.port, "Starting API server");

    let config = load_optional_config(args.config.as_deref()).await?;
    let state = api::create_app_state(&args.db, config.as_ref()).await?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ExemptorError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
