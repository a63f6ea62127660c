//! Example to run the HEXHIVE server standalone
//!
//! Run with: cargo run -p hexhive-server --example run_server [preset]

use hexhive_core::Rules;
use hexhive_server::{run_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let preset = std::env::args().nth(1).unwrap_or_else(|| "standard".to_string());
    let rules = Rules::preset(&preset)
        .ok_or_else(|| anyhow::anyhow!("unknown rules preset: {}", preset))?;

    let config = ServerConfig { rules, ..ServerConfig::default() };

    println!("Starting HEXHIVE server on port {}", config.port);
    println!("Try: curl -X POST http://localhost:{}/api/games", config.port);

    run_server(config).await
}
