use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dubbing::app;
use dubbing::config::settings::AppConfig;
use dubbing::infrastructure::db::pool::connect_to_db;
use dubbing::infrastructure::store::{MemoryStore, PgStore, Store};
use dubbing::modules::language::service::LanguageService;
use dubbing::state::AppState;
use dubbing::workers::stages::{FfprobeProbe, Stages};
use dubbing::workers::{Dispatcher, Orchestrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dubbing=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting server...");

    let config = AppConfig::new()?;
    for dir in [&config.upload_dir, &config.output_dir, &config.scratch_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(connect_to_db(url).await?)),
        None => {
            warn!("DATABASE_URL not set - records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    LanguageService::seed_defaults(store.as_ref()).await?;

    let stages = Stages::from_config(&config)?;
    let orchestrator = Arc::new(Orchestrator::new(
        store.clone(),
        stages,
        config.output_dir.clone(),
    ));
    let dispatcher = Arc::new(Dispatcher::start(orchestrator, config.workers));
    let probe = Arc::new(FfprobeProbe::new(&config.tools));

    let port = config.server_port;
    let state = AppState::new(config, store, probe, dispatcher.clone());
    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);
    info!("Swagger UI on http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Waiting for running dubbing jobs...");
    dispatcher.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
