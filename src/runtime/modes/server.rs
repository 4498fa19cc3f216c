//! Server mode
//!
//! This module contains the HTTP server startup logic.

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::TimingMiddleware;
use crate::api::services::routes;
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// This function:
/// 1. Prepares server components (store, registrar, hit recorder)
/// 2. Configures and starts the HTTP server
/// 3. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {:#}", e);
            e
        })?;

    let registrar = startup.registrar.clone();
    let redirector = startup.redirector.clone();
    let stats = startup.stats.clone();
    let site = startup.site.clone();
    let recorder = startup.recorder.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware)
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(web::Data::new(registrar.clone()))
            .app_data(web::Data::new(redirector.clone()))
            .app_data(web::Data::new(stats.clone()))
            .app_data(web::Data::new(site.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .configure(routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .disable_signals()
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("server listen on {} failed", bind_address))?
        .run();
    let handle = server.handle();

    // Wait for server or shutdown signal
    let result = tokio::select! {
        res = server => res.context("server listen and serve failed"),
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            Ok(())
        }
    };

    // 服务器停止后再清空点击队列
    lifetime::shutdown::drain_hits(&recorder).await;
    warn!("Graceful shutdown: all tasks completed");

    result
}
