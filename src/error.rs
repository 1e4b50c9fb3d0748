//! Error types for the broadcast server
//!
//! Defines application-level errors, configuration errors and
//! queue send errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// All of these are terminal for the connection (or, at startup,
/// for the process). None of them is ever propagated to another session.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (read failure on a connection, or bind failure at startup)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Channel send error (fatal - the broadcast engine is gone)
    #[error("Channel send error")]
    ChannelSend,
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Port argument is not a valid u16
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// Host argument is empty
    #[error("Invalid bind address: {0:?}")]
    InvalidHost(String),

    /// Read buffer must hold at least one byte
    #[error("Read buffer size must be greater than zero")]
    ZeroReadBuffer,
}

/// Message send errors
///
/// Occurs when enqueueing onto a session whose writer loop has terminated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}

impl From<SendError> for AppError {
    fn from(_: SendError) -> Self {
        AppError::ChannelSend
    }
}
