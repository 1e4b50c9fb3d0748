//! Broadcast message definitions
//!
//! A broadcast message is rendered on the wire as
//! `[<remote-address>]<display-name>: <text>`.
//! It has no identity of its own: one is produced per inbound read
//! and consumed once by the fan-out step.

use std::fmt;

/// Text of the notice broadcast when a session comes online
pub const ONLINE_TEXT: &str = "online";

/// Text of the notice broadcast when a session's peer closes the stream
pub const OFFLINE_TEXT: &str = "offline";

/// One inbound message, attributed to the session that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage {
    /// Remote address of the sending session
    pub addr: String,
    /// Display name of the sending session
    pub name: String,
    /// Message body
    pub text: String,
}

impl BroadcastMessage {
    pub fn new(addr: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            name: name.into(),
            text: text.into(),
        }
    }

    /// Build a message from the bytes of a single read
    ///
    /// Only `bytes` is used, so callers must slice the read buffer to the
    /// number of bytes actually read. Invalid UTF-8 is replaced, and one
    /// trailing line terminator is dropped since the writer adds its own.
    pub fn from_read(addr: &str, name: &str, bytes: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(bytes);
        let text = raw
            .strip_suffix('\n')
            .map(|t| t.strip_suffix('\r').unwrap_or(t))
            .unwrap_or(&*raw);
        Self::new(addr, name, text)
    }
}

impl fmt::Display for BroadcastMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}: {}", self.addr, self.name, self.text)
    }
}
