use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use timesheet::shared::infrastructure::sqlite::SqliteStore;
use timesheet::shell::config::{AppConfig, Cli, Command};
use timesheet::shell::http::router_with_timeout;
use timesheet::shell::state::{AppState, Backends};

async fn backends(config: &AppConfig) -> anyhow::Result<Backends> {
    match &config.database_url {
        Some(url) => {
            let store = SqliteStore::connect(url).await?;
            Ok(Backends::sqlite(&store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            Ok(Backends::in_memory())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = cli.config.validate()?;
    let state = AppState::assemble(
        backends(&config).await?,
        config.cache_policy(),
        config.datalake_batch_size,
    )
    .await;

    match cli.command.unwrap_or(Command::Serve) {
        Command::RebuildDatalake => {
            let written = state.rebuild.handle().await?;
            tracing::info!(written, "datalake rebuilt");
        }
        Command::Serve => {
            let app = router_with_timeout(state, config.request_timeout());
            tracing::info!(
                environment = ?config.environment,
                "Listening on http://{}, GraphQL at /graphql",
                config.bind_addr
            );
            let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }
    Ok(())
}
