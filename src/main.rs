use axum::{Router, routing};
use chrono::Utc;
use gate_notify::api::{handle_webhook, root, status};
use gate_notify::error::NotifyError;
use gate_notify::slack::SlackClient;
use gate_notify::{AppState, NotifierConfig};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;
use tracing::{self, info};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_CONFIG_PATH: &str = "gate_notify.toml";

/// Load and parse the configuration file
fn load_config(path: &str) -> Result<NotifierConfig, NotifyError> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        NotifyError::ConfigError(format!("Failed to read config file '{}': {}", path, e))
    })?;

    let config: NotifierConfig = toml::from_str(&config_str).map_err(|e| {
        NotifyError::ConfigError(format!("Failed to parse config file '{}': {}", path, e))
    })?;

    Ok(config)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let config_path =
        std::env::var("NOTIFIER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config: NotifierConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        config,
        slack: SlackClient::new(),
        start_time: Instant::now(),
        started_at: Utc::now(),
        delivered: AtomicU64::new(0),
        failed: AtomicU64::new(0),
    });

    tracing_subscriber::fmt::init();
    let app = Router::new()
        .route("/", routing::get(root))
        .route("/webhook", routing::post(handle_webhook))
        .route("/status", routing::get(status))
        .with_state(state);

    info!("Listening on {}", bind_address);
    info!("Using config at {:?}", config_path);
    let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
