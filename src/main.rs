//! Exam-prep chat server
//!
//! Entry point: loads configuration and serves the chat widget.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use exam_prep_chat::{config::AppConfig, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before config reads the environment
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;

    info!(
        name: "config.loaded",
        host = %config.server.host,
        port = config.server.port,
        static_dir = %config.server.static_dir,
        "Configuration loaded"
    );

    server::start_server(Arc::new(config)).await
}
