use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concierge::api::{create_router, AppState};
use concierge::config::Config;
use concierge::db::{Database, DatabaseBackend, LibSqlBackend};
use concierge::embeddings::EmbeddingProvider;
use concierge::llm::LlmProvider;
use concierge::migration;
use concierge::processing::{resolve_data_dir, IngestPipeline, TextChunker};

/// How often an embedded replica pulls from its remote primary.
const REPLICA_SYNC_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "concierge")]
#[command(about = "Customer-support chatbot for Hôtel So'Co")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Rebuild the knowledge store and operational collections from JSON files
    Ingest {
        /// Directory holding hotel_knowledge.json, content/ and mock_operations.json
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Recreate the knowledge table when the embedding width changed
        #[arg(long)]
        rebuild_embeddings: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concierge=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Loading embedding model: {}...", config.embeddings.model);
    let embeddings = EmbeddingProvider::new(&config.embeddings)?;

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database, embeddings.dimensions()).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db, embeddings).await,
        Command::Ingest {
            data_dir,
            rebuild_embeddings,
        } => ingest(config, db, embeddings, data_dir, rebuild_embeddings).await,
    }
}

async fn ingest(
    config: Config,
    db: Arc<dyn DatabaseBackend>,
    embeddings: EmbeddingProvider,
    data_dir: Option<PathBuf>,
    rebuild_embeddings: bool,
) -> anyhow::Result<()> {
    match migration::check_dimension_compatibility(&*db, &embeddings, rebuild_embeddings).await? {
        migration::MigrationDecision::NotNeeded => {}
        migration::MigrationDecision::Approved => {
            migration::rebuild_knowledge(&*db, embeddings.dimensions()).await?;
        }
        migration::MigrationDecision::Rejected => {
            return Err(anyhow::anyhow!(
                "Embedding dimension mismatch - use --rebuild-embeddings to recreate the knowledge table"
            ));
        }
    }

    let data_dir = resolve_data_dir(data_dir, &config.ingestion.data_dir);
    tracing::info!("Ingesting knowledge from {}", data_dir.display());

    let chunker = TextChunker::new(&config.processing)?;
    let pipeline = IngestPipeline::new(db.clone(), embeddings, chunker);
    let report = pipeline.run(&data_dir).await?;

    tracing::info!(
        documents = report.documents,
        chunks = report.chunks,
        "Knowledge ingested"
    );
    for (collection, count) in &report.records {
        tracing::info!(%collection, count, "Operational records loaded");
    }

    db.sync().await?;
    Ok(())
}

async fn serve(
    config: Config,
    db: Arc<dyn DatabaseBackend>,
    embeddings: EmbeddingProvider,
) -> anyhow::Result<()> {
    migration::ensure_dimensions_match(&*db, &embeddings).await?;

    let llm = LlmProvider::new(config.llm.as_ref());
    if let Some(llm_config) = &config.llm {
        tracing::info!(
            backend = ?llm.backend(),
            "Initializing LLM provider: {}...",
            llm_config.model
        );
    }
    if !llm.is_available() {
        tracing::warn!(
            "LLM unavailable - every message will be answered as unknown with the fallback text"
        );
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(&config, db, embeddings, llm);

    let cancel_token = CancellationToken::new();

    let sync_db = state.db.clone();
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Replica sync shutting down...");
                    break;
                }
                _ = tokio::time::sleep(REPLICA_SYNC_INTERVAL) => {
                    if let Err(e) = sync_db.sync().await {
                        tracing::error!("Replica sync error: {}", e);
                    }
                }
            }
        }
    });

    let app = create_router(state);

    tracing::info!("Concierge starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping background tasks...");
    cancel_token.cancel();
}
