//! Server mode
//!
//! Configures and starts the HTTP host.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::services::{link_api_routes, redirect_routes};
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// Builds the link service from the global config, serves until the server
/// stops or Ctrl+C arrives, then flushes buffered clicks.
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = crate::config::get_config();

    let link_service = lifetime::startup::prepare_server_startup(&config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;
    let service_for_shutdown = link_service.clone();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Short links will be issued under {}", config.links.base_url);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::PayloadConfig::new(64 * 1024))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .service(link_api_routes())
            .service(redirect_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
            lifetime::shutdown::perform_shutdown_tasks(&service_for_shutdown).await;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&service_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
