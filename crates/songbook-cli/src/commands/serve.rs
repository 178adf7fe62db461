use std::sync::Arc;

use anyhow::{Context, Result};
use songbook_api::http::router;
use songbook_api::{Config, SongService, SongStore};
use songbook_core::schema::Database;
use songbook_lyrics::GeniusClient;
use tokio::net::TcpListener;

/// Open the database, wire the layers together and serve until Ctrl-C.
pub async fn run_serve(config: Config) -> Result<()> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database_path.display()
        )
    })?;
    log::info!("Using database {}", config.database_path.display());

    if config.lyrics_api_token.is_none() {
        log::warn!("No lyrics API token configured; adding songs will fail");
    }
    let lyrics = GeniusClient::new(config.lyrics_settings())
        .context("Failed to create lyrics client")?;

    let service = SongService::new(SongStore::new(db, Arc::new(lyrics)));
    let app = router(service);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
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
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log::info!("Received Ctrl-C"),
        () = terminate => log::info!("Received SIGTERM"),
    }
    log::info!("Shutting down");
}
