//! Broadcast engine
//!
//! A single consumer task that takes inbound messages off one channel and
//! fans each one out to every registered session. Only one fan-out is in
//! flight at a time, so every session sees messages in submission order.
//!
//! Both the inbound channel and the per-session queues are unbounded: a
//! producer never waits on a slow consumer. The flip side is that a session
//! whose peer stops reading accumulates backlog without limit. That memory
//! growth is neither detected nor reported.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::SendError;
use crate::message::BroadcastMessage;
use crate::registry::Registry;
use crate::session::Session;

/// Handle for submitting messages to the broadcast engine
#[derive(Debug, Clone)]
pub struct Broadcaster {
    sender: mpsc::UnboundedSender<BroadcastMessage>,
}

impl Broadcaster {
    /// Submit a message for fan-out
    ///
    /// Never blocks. Fails only if the engine has stopped.
    pub fn submit(&self, msg: BroadcastMessage) -> Result<(), SendError> {
        self.sender.send(msg).map_err(|_| SendError::ChannelClosed)
    }

    /// Submit `text` attributed to `session`
    pub fn send_from(&self, session: &Session, text: impl Into<String>) -> Result<(), SendError> {
        self.submit(BroadcastMessage::new(
            session.addr.clone(),
            session.name.clone(),
            text,
        ))
    }
}

/// The broadcast engine task
pub struct BroadcastEngine {
    /// Sessions to fan out to
    registry: Arc<Registry>,
    /// Inbound message receiver channel
    receiver: mpsc::UnboundedReceiver<BroadcastMessage>,
}

impl BroadcastEngine {
    /// Create an engine over `registry` and the handle that feeds it
    pub fn new(registry: Arc<Registry>) -> (Self, Broadcaster) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { registry, receiver }, Broadcaster { sender })
    }

    /// Run the fan-out loop
    ///
    /// Continuously receives and delivers messages until every
    /// `Broadcaster` is dropped.
    pub async fn run(mut self) {
        info!("Broadcast engine started");

        while let Some(msg) = self.receiver.recv().await {
            self.fan_out(&msg).await;
        }

        info!("Broadcast engine shutting down");
    }

    /// Deliver one message to the full current session set
    async fn fan_out(&self, msg: &BroadcastMessage) -> usize {
        let line = msg.to_string();
        let snapshot = self.registry.snapshot_for_broadcast().await;
        let delivered = snapshot.deliver(&line);
        drop(snapshot);

        debug!("Broadcast from {} delivered to {} sessions", msg.addr, delivered);
        delivered
    }
}
