use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;

mod config;
mod controllers;
mod error;
mod pages;
mod render;
mod routes;

use config::Config;
use pages::PageStore;
use render::Templates;
use routes::RouteTable;

/// Shared, read-only after startup
pub struct AppState {
    pub store: PageStore,
    pub templates: Templates,
    pub routes: RouteTable,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Wiki v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let templates = Templates::new();
    let routes =
        RouteTable::new().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let store = PageStore::new(config.data_dir.clone());
    store.ensure_data_dir()?;
    log::info!("Page data directory: {:?}", store.data_dir());

    let state = web::Data::new(AppState {
        store,
        templates,
        routes,
    });

    log::info!("Listening on http://{}:{}", config.bind_addr, config.port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(controllers::wiki::config)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
