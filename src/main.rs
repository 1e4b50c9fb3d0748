//! Multi-client Text Broadcast Server - Entry Point
//!
//! Usage: `line_broadcast [host] [port]`

use std::env;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use line_broadcast::{AppError, ChatServer, Config};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging with environment filter
    // e.g., RUST_LOG=debug or RUST_LOG=line_broadcast=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("line_broadcast=info")),
        )
        .init();

    let config = Config::from_args(env::args().skip(1))?;

    // Bind failure is fatal
    let listener = TcpListener::bind(config.bind_addr()).await?;

    ChatServer::new(config)?.run(listener).await;

    Ok(())
}
