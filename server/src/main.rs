//! Todo API server binary.
//!
//! # Configuration
//!
//! Environment variables:
//! - `TODO_PORT`: Port to listen on (default: 3001)
//! - `TODO_DATA_FILE`: Path to the JSON store (default: ~/.local/share/todo-server/todos.json)
//! - `TODO_ALLOWED_ORIGIN`: Browser origin allowed by CORS (default: http://localhost:3000)
//! - `TODO_CONFIG`: Path to config file (default: ~/.config/todo-server/config.yaml)

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use todo_server::config::Config;
use todo_server::store::TodoStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("TODO_CONFIG").ok().map(PathBuf::from);
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let allowed_origin = match HeaderValue::from_str(&config.allowed_origin) {
        Ok(origin) => origin,
        Err(e) => {
            tracing::error!("Invalid allowed origin '{}': {}", config.allowed_origin, e);
            std::process::exit(1);
        }
    };

    if let Some(parent) = config.data_file.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("Failed to create data directory: {}", e);
            std::process::exit(1);
        }
    }

    let store = match TodoStore::open(&config.data_file) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = &config.config_file {
        tracing::info!("Config file: {}", path.display());
    }
    tracing::info!("Store file: {}", config.data_file.display());
    tracing::info!("Allowed origin: {}", config.allowed_origin);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on {addr}");

    if let Err(e) = todo_server::run(listener, store, allowed_origin).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
