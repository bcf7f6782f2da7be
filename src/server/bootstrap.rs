use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::db;
use crate::raffle::storage::SeaOrmRaffleStorage;
use crate::raffle::{RaffleRegistryFactory, RaffleReportsFactory, RaffleServiceFactory};

use super::{RaffleServer, ServerContext};

const LOG_TARGET: &str = "server::bootstrap";

pub async fn run_server(config: AppConfig) -> Result<()> {
    let connection = db::connect(&config.database_url).await?;
    let storage = Arc::new(SeaOrmRaffleStorage::new(connection));

    let context = Arc::new(ServerContext {
        storage: storage.clone(),
        service: Arc::new(RaffleServiceFactory::new(storage.clone())),
        registry: Arc::new(RaffleRegistryFactory::new(storage.clone())),
        reports: Arc::new(RaffleReportsFactory::new(storage)),
    });

    let router = RaffleServer::new(context).into_router();

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    info!(target = LOG_TARGET, %local_addr, "raffle server listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")
}

async fn shutdown_signal() {
    use tracing::warn;

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = LOG_TARGET,
            error = %err,
            "failed to install ctrl-c handler"
        );
    }
    info!(target = LOG_TARGET, "shutdown signal received");
}
