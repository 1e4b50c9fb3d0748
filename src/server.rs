//! Server root and connection acceptor
//!
//! `ChatServer` owns the registry and the broadcast engine handle and
//! passes them to every connection handler. There is no global state.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::broadcast::{BroadcastEngine, Broadcaster};
use crate::config::Config;
use crate::error::ConfigError;
use crate::handler::handle_connection;
use crate::registry::Registry;

/// Shared state handed to each connection handler
#[derive(Debug, Clone)]
pub struct ServerContext {
    /// Active sessions
    pub registry: Arc<Registry>,
    /// Inbound side of the broadcast engine
    pub broadcaster: Broadcaster,
    /// Bytes requested per read
    pub read_buffer_size: usize,
}

/// The broadcast server
pub struct ChatServer {
    config: Config,
    registry: Arc<Registry>,
    broadcaster: Broadcaster,
    engine: JoinHandle<()>,
}

impl ChatServer {
    /// Create the server and start its broadcast engine
    ///
    /// The config is validated first. Must be called from within a
    /// tokio runtime.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let registry = Arc::new(Registry::new());
        let (engine, broadcaster) = BroadcastEngine::new(registry.clone());
        let engine = tokio::spawn(engine.run());

        Ok(Self {
            config,
            registry,
            broadcaster,
            engine,
        })
    }

    /// Shared state for a new connection handler
    pub fn context(&self) -> ServerContext {
        ServerContext {
            registry: self.registry.clone(),
            broadcaster: self.broadcaster.clone(),
            read_buffer_size: self.config.read_buffer_size,
        }
    }

    /// Active sessions
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Accept connections forever
    ///
    /// Accept errors are logged and the loop continues. Each connection
    /// gets its own handler task.
    pub async fn run(self, listener: TcpListener) {
        if let Ok(addr) = listener.local_addr() {
            info!("Broadcast server listening on {}", addr);
        }

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("New connection from {}", addr);
                    let ctx = self.context();

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr.to_string(), ctx).await {
                            warn!("Connection from {} ended with error: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

impl Drop for ChatServer {
    fn drop(&mut self) {
        self.engine.abort();
    }
}
