//! Connection handler
//!
//! Handles one client connection: materializes its session, spawns the
//! writer loop, registers the session, then runs the inbound reader loop
//! on the handler task itself until the peer goes away.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::message::{BroadcastMessage, OFFLINE_TEXT, ONLINE_TEXT};
use crate::server::ServerContext;
use crate::session::{run_writer, Session};

/// Handle a new connection from `remote_addr`
///
/// Returns once the reader loop has ended and the writer loop has
/// drained. Whatever ends the reader, the session is unregistered before
/// the error (if any) is returned.
pub async fn handle_connection<S>(
    stream: S,
    remote_addr: String,
    ctx: ServerContext,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, writer) = tokio::io::split(stream);

    let (session, outbound) = Session::new(remote_addr);
    debug!("Session {} created for {}", session.id, session.addr);

    // Spawn write task (outbound queue -> connection)
    let write_task = tokio::spawn(run_writer(outbound, writer, session.id));

    // Go online, then read loop (connection -> broadcast engine)
    ctx.registry.register(session.clone()).await;
    let result = serve_session(&mut reader, &session, &ctx).await;

    // Every exit path leaves the registry; the id check makes a repeat a no-op
    ctx.registry.unregister(&session.name, session.id).await;

    // Outbound queue closes once the registry and this handle let go
    let id = session.id;
    drop(session);
    match write_task.await {
        Ok(exit) => debug!("Writer for session {} ended: {:?}", id, exit),
        Err(e) => warn!("Writer task for session {} failed: {}", id, e),
    }

    result
}

/// Announce the session, then read until the peer goes away
async fn serve_session<R>(reader: &mut R, session: &Session, ctx: &ServerContext) -> Result<(), AppError>
where
    R: AsyncRead + Unpin,
{
    ctx.broadcaster.send_from(session, ONLINE_TEXT)?;
    info!("{} online", session.name);

    let mut buf = vec![0u8; ctx.read_buffer_size];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                // Leave first so the notice only reaches the others
                ctx.registry.unregister(&session.name, session.id).await;
                ctx.broadcaster.send_from(session, OFFLINE_TEXT)?;
                info!("{} offline", session.name);
                return Ok(());
            }
            Ok(n) => {
                let msg = BroadcastMessage::from_read(&session.addr, &session.name, &buf[..n]);
                ctx.broadcaster.submit(msg)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
