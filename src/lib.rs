pub mod api;
pub mod catalog;
pub mod config;
pub mod middleware;
pub mod server;
pub mod service;
pub mod util;

use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: Option<&str>, port: Option<u16>) -> Result<(), ServerError> {
    let mut config = config::Config::load(config_path)?;
    if let Some(port) = port {
        config.listen.port = port;
    }

    match config_path {
        Some(path) => info!("Using config file: {}", path),
        None => info!("No config file given, using defaults"),
    }
    info!("Service name: {}", config.service_name);

    let service = Arc::new(service::RecommendationService::new(catalog::Catalog::seeded()));
    let emotions: Vec<&str> = service.catalog().emotions().map(|e| e.as_str()).collect();
    info!("Emotions: {}", emotions.join(", "));

    let addr = config.listen_addr()?;
    let tls_paths = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_string(), key.to_string()));

    let state = server::AppState::new(config, service);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls_paths {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
