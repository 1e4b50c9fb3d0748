//! Multi-client Text Broadcast Server Library
//!
//! A minimal line broadcast server built on tokio: every chunk of text one
//! client sends is fanned out to every connected client, sender included.
//!
//! # Features
//! - TCP connection handling
//! - Per-session unbounded outbound queue with a dedicated writer task
//! - Session registry keyed by display name
//! - Serialized broadcast fan-out with a global delivery order
//! - Online/offline notices
//!
//! # Architecture
//! - `ChatServer` owns the `Registry` and the `BroadcastEngine` handle
//! - Each connection runs a `handler` task (the inbound reader) plus a
//!   spawned writer task draining its session's queue
//! - The `BroadcastEngine` is a single task; it holds the registry lock
//!   for the whole of each fan-out
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use line_broadcast::{ChatServer, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let listener = TcpListener::bind(config.bind_addr()).await.unwrap();
//!     ChatServer::new(config).unwrap().run(listener).await;
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use broadcast::{BroadcastEngine, Broadcaster};
pub use config::Config;
pub use error::{AppError, ConfigError, SendError};
pub use handler::handle_connection;
pub use message::BroadcastMessage;
pub use registry::{BroadcastSnapshot, Registry};
pub use server::{ChatServer, ServerContext};
pub use session::{run_writer, Session, WriterExit};
pub use types::SessionId;
