//! # Backend Service
//!
//! Thin entry point that delegates to lib-web for server setup.
//! Everything else (bind address, origins, assistant) comes from the environment.

use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    start_server(ServerConfig::default()).await
}
