//! Session definition and writer loop
//!
//! A `Session` is the handle to one connected client: identity, remote
//! address and the sending side of its outbound queue. The receiving side
//! is owned by `run_writer`, which drains it onto the connection.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::SendError;
use crate::types::SessionId;

/// Receiving side of a session's outbound queue
pub type OutboundReceiver = mpsc::UnboundedReceiver<String>;

/// Connected client session
///
/// Cloning yields another handle to the same outbound queue. The writer
/// loop ends once every handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Display name (defaults to the remote address)
    pub name: String,
    /// Remote address as reported by the transport
    pub addr: String,
    /// Outbound message queue (unbounded FIFO)
    outbound: mpsc::UnboundedSender<String>,
}

impl Session {
    /// Create a session for a connection from `addr`
    ///
    /// Returns the session handle and the receiver for its writer loop.
    pub fn new(addr: impl Into<String>) -> (Self, OutboundReceiver) {
        let addr = addr.into();
        Self::with_name(addr.clone(), addr)
    }

    /// Create a session with an explicit display name
    pub fn with_name(addr: impl Into<String>, name: impl Into<String>) -> (Self, OutboundReceiver) {
        let (outbound, receiver) = mpsc::unbounded_channel();
        let session = Self {
            id: SessionId::new(),
            name: name.into(),
            addr: addr.into(),
            outbound,
        };
        (session, receiver)
    }

    /// Append a message to the outbound queue
    ///
    /// Never blocks. Fails only if the writer loop has already terminated.
    pub fn enqueue(&self, msg: String) -> Result<(), SendError> {
        self.outbound.send(msg).map_err(|_| SendError::ChannelClosed)
    }

    /// Check whether the writer loop is still accepting messages
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

/// Why a writer loop stopped
#[derive(Debug)]
pub enum WriterExit {
    /// Every session handle was dropped and the queue was drained
    QueueClosed,
    /// Writing to the connection failed; the connection is presumed dead
    WriteFailed(std::io::Error),
}

/// Drain the outbound queue onto the connection
///
/// Each message is written followed by `\n`. Runs until the queue closes
/// or the first write error; there is no retry.
pub async fn run_writer<W>(mut outbound: OutboundReceiver, mut writer: W, id: SessionId) -> WriterExit
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut line) = outbound.recv().await {
        line.push('\n');
        if let Err(e) = write_line(&mut writer, &line).await {
            debug!("Write failed for session {}, ending writer: {}", id, e);
            return WriterExit::WriteFailed(e);
        }
    }

    debug!("Outbound queue closed for session {}", id);
    let _ = writer.shutdown().await;
    WriterExit::QueueClosed
}

async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use tokio::io::AsyncReadExt;

    use super::*;

    #[test]
    fn test_session_defaults_name_to_addr() {
        let (session, _rx) = Session::new("127.0.0.1:5001");

        assert_eq!(session.addr, "127.0.0.1:5001");
        assert_eq!(session.name, "127.0.0.1:5001");
        assert!(!session.is_closed());
    }

    #[test]
    fn test_session_with_name() {
        let (session, _rx) = Session::with_name("127.0.0.1:5001", "alice");

        assert_eq!(session.addr, "127.0.0.1:5001");
        assert_eq!(session.name, "alice");
    }

    #[test]
    fn test_enqueue_fifo() {
        let (session, mut rx) = Session::new("a");

        session.enqueue("one".to_string()).unwrap();
        session.enqueue("two".to_string()).unwrap();

        assert_eq!(rx.try_recv().unwrap(), "one");
        assert_eq!(rx.try_recv().unwrap(), "two");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_enqueue_after_writer_gone() {
        let (session, rx) = Session::new("a");
        drop(rx);

        assert!(session.is_closed());
        assert_eq!(session.enqueue("x".to_string()), Err(SendError::ChannelClosed));
    }

    #[test]
    fn test_enqueue_never_blocks_with_stalled_consumer() {
        // Receiver is held but never polled
        let (session, _rx) = Session::new("a");
        let started = Instant::now();

        for i in 0..200_000 {
            session.enqueue(format!("message {}", i)).unwrap();
        }

        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_writer_appends_newline_in_order() {
        let (session, rx) = Session::new("a");
        let (writer, mut peer) = tokio::io::duplex(1024);
        let task = tokio::spawn(run_writer(rx, writer, session.id));

        session.enqueue("first".to_string()).unwrap();
        session.enqueue("second".to_string()).unwrap();
        drop(session);

        let exit = task.await.unwrap();
        assert!(matches!(exit, WriterExit::QueueClosed));

        let mut out = String::new();
        peer.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "first\nsecond\n");
    }

    #[tokio::test]
    async fn test_writer_stops_on_write_error() {
        let (session, rx) = Session::new("a");
        let (writer, peer) = tokio::io::duplex(64);
        drop(peer);

        let task = tokio::spawn(run_writer(rx, writer, session.id));
        session.enqueue("lost".to_string()).unwrap();

        let exit = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(exit, WriterExit::WriteFailed(_)));

        // Writer dropped its receiver, so further enqueues report it
        assert!(session.is_closed());
    }
}
