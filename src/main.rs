use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use theme_mirror::commit::GitSnapshotter;
use theme_mirror::config::Config;
use theme_mirror::fetch::HttpFetcher;
use theme_mirror::layout::ShopLayout;
use theme_mirror::server::{AppState, build_router};
use theme_mirror::worker::{QUEUE_CAPACITY, ThemeWorker, channel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "theme_mirror=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let worker = ThemeWorker::new(
        ShopLayout::new(&config.dir),
        fetcher,
        GitSnapshotter::default(),
    );

    let (sender, receiver) = channel(QUEUE_CAPACITY);
    let shutdown = CancellationToken::new();
    let worker_handle = tokio::spawn(worker.run(receiver, shutdown.clone()));

    let app = build_router(AppState::new(sender));

    let listener = tokio::net::TcpListener::bind(&config.host)
        .await
        .with_context(|| format!("failed to bind {}", config.host))?;
    info!(host = %config.host, dir = %config.dir.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    shutdown.cancel();
    if let Err(e) = worker_handle.await {
        warn!(error = %e, "Worker task failed");
    }

    info!("Shut down");
    Ok(())
}

/// Completes on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
    info!("Shutdown signal received");
}
