use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use mmbot::core::Config;
use mmbot::execution::OrderManager;
use mmbot::mm2::{Mm2Client, Mm2Process};
use mmbot::pricing::OrderbookMid;
use mmbot::strategy::{RefreshLoop, StrategyEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mmbot=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();

    tracing::info!("🦀 mmbot starting...");

    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::load(std::path::Path::new(&path))?,
        None => Config::load_default()?,
    };
    if let Ok(userpass) = std::env::var("MM2_USERPASS") {
        config.daemon.userpass = userpass;
    }

    let client = Arc::new(Mm2Client::new(&config.daemon));

    // Launch and supervise the daemon ourselves if asked to; otherwise we
    // expect one to already be listening on the endpoint.
    let process = if config.daemon.manage_process {
        Some(Mm2Process::launch(&config.daemon).await?)
    } else {
        None
    };

    let version = client.rpc_version().await?;
    tracing::info!(version = %version.result, "connected to daemon");

    client.enable_coins(&config.coins).await?;

    let mut engine = StrategyEngine::new(Arc::new(OrderbookMid::new(client.clone())));
    for strategy in &config.strategies {
        engine.add_strategy(strategy.to_strategy());
    }
    if config.strategies.is_empty() {
        tracing::warn!("no strategies configured; the refresh loop will idle");
    }

    let manager = Arc::new(OrderManager::new(client.clone()));
    let refresh = RefreshLoop::new(engine, manager, &config.refresh);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let outcome = refresh.run(shutdown_rx).await;

    if let Some(process) = process {
        process.shutdown(&client).await?;
    }

    outcome.map_err(Into::into)
}
