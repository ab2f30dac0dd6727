use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info, warn};

use cas_task_cleaner::{
    Ctx,
    cleaner::{CasClient, CleanerService, EventDeduplicator},
    config::{AppConfig, LoadedConfig},
    logging, notifier, routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = AppConfig::default_path();
    let LoadedConfig { config, issues } = AppConfig::load(Some(&config_path))
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let _log_guard = logging::init(&config.log, config.cleaner.debug_log)?;
    info!("Starting cas-task-cleaner v{}", env!("CARGO_PKG_VERSION"));

    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue);
        } else {
            warn!("{}", issue);
        }
    }

    if !config.cleaner.enabled {
        warn!("Cleaner is disabled or missing its CAS host/api_key, nothing to do");
        return Ok(());
    }

    let client = CasClient::new(&config.cleaner.host, config.cleaner.api_key.clone())
        .context("Failed to build CAS client")?;
    if let Err(e) = client.test_connection().await {
        error!("CAS connection test failed: {}", e);
    }

    let notifier =
        notifier::build_notifier(&config.notifier).context("Failed to build notifier")?;
    info!("Notifications via {}", notifier.id());

    let cleaner = Arc::new(CleanerService::new(
        config.cleaner.clone(),
        Arc::new(client),
        notifier,
        Arc::new(EventDeduplicator::new()),
    ));

    let bind_address = config.server.bind_address();
    let ctx = Ctx {
        config: Arc::new(config),
        cleaner,
    };

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    info!("Listening for webhooks on {}", bind_address);

    axum::serve(listener, routes::router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
