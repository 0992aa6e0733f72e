use game_companion::{
    router, AppConfig, AppState, InMemorySessionRepository, SessionRepository, SessionService,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_companion=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        error!(%err, "Game companion server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    info!(bind_addr = %config.bind_addr, "Starting game companion server");

    let registry = Arc::new(config.build_registry()?);

    let session_repository: Arc<dyn SessionRepository> = match &config.seed_file {
        Some(path) => Arc::new(InMemorySessionRepository::from_json_file(path).await?),
        None => Arc::new(InMemorySessionRepository::new()),
    };

    let session_service = Arc::new(SessionService::new(session_repository, registry));
    let app = router(AppState::new(session_service))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
