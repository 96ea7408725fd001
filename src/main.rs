use std::sync::Arc;

use clap::{Parser, Subcommand};
use matching_engine::config::EngineConfig;
use matching_engine::engine::Engine;
use matching_engine::persistence::pipeline::{self, Pipeline};
use matching_engine::persistence::store::Store;
use matching_engine::recovery;
use matching_engine::state::AppState;
use matching_engine::utils::shutdown_token;
use matching_engine::webhook::WebhookClient;
use tokio::sync::Mutex;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "matching-engine")]
#[command(version = "0.1", about = "Single-venue equities limit-order matching engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the HTTP server (default if no subcommand is given).
    Server {
        #[arg(long)]
        port: Option<u16>,
    },
}

async fn build_state(config: &EngineConfig) -> anyhow::Result<(AppState, Pipeline, tokio::sync::mpsc::Receiver<matching_engine::persistence::events::PersistEvent>)> {
    let store = Arc::new(Store::open(&config.store_path)?);
    let (persistence_pipeline, rx) = Pipeline::new(config.persistence_queue_capacity, config.flush_batch_threshold);
    let mut engine = Engine::new(persistence_pipeline.clone());

    tracing::info!("running recovery from {}", config.store_path);
    recovery::recover(&store, &mut engine)?;
    tracing::info!("recovery complete");

    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        store,
        config: Arc::new(config.clone()),
    };
    Ok((state, persistence_pipeline, rx))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = EngineConfig::from_env()?;
    let cli = Cli::parse();
    if let Some(Commands::Server { port: Some(port) }) = &cli.command {
        config.bind_addr = format!("0.0.0.0:{port}");
    }

    let (state, persistence_pipeline, rx) = build_state(&config).await?;
    let shutdown = shutdown_token();

    let flusher_shutdown = shutdown.clone();
    let flusher_store = state.store.clone();
    let webhook_client = WebhookClient::new(config.webhook_timeout());
    let flush_interval = config.flush_interval();
    let batch_threshold = config.flush_batch_threshold;
    let flusher = tokio::spawn(async move {
        pipeline::run_flusher(
            persistence_pipeline,
            rx,
            flusher_store,
            webhook_client,
            flush_interval,
            batch_threshold,
            flusher_shutdown,
        )
        .await;
    });

    let app = matching_engine::api::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "matching engine listening");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
        .await?;

    shutdown.cancel();
    flusher.await?;
    Ok(())
}
