use log::{error, info, warn};
use std::net::SocketAddr;

use rusty_todos::config::ServerConfig;
use rusty_todos::handlers::{api_routes, AppState};
use rusty_todos::security_logger::init_security_logger;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, run until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Load config from the environment (and .env, if present)
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, tls={}, min_password_length={}",
        config.host, config.port, config.enable_tls, config.min_password_length
    );

    init_security_logger();

    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };

    let routes = api_routes(&state, config.max_body_bytes);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    match (config.enable_tls, &config.tls_cert_path, &config.tls_key_path) {
        (true, Some(cert_path), Some(key_path)) => {
            let (bound, server) = warp::serve(routes)
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .bind_with_graceful_shutdown(addr, shutdown_signal());

            info!("Starting Rusty Todos server on https://{}", bound);
            server.await;
        }
        (true, _, _) => {
            error!("TLS is enabled but certificate or key path is missing");
            std::process::exit(1);
        }
        (false, _, _) => {
            warn!("TLS disabled; tokens travel in clear text. Use a TLS-terminating proxy in production");

            match warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown_signal()) {
                Ok((bound, server)) => {
                    info!("Starting Rusty Todos server on http://{}", bound);
                    server.await;
                }
                Err(e) => {
                    error!("Failed to bind {}: {}", addr, e);
                    std::process::exit(1);
                }
            }
        }
    }

    info!("Server stopped");
}
