//! Session registry
//!
//! The shared mapping of active sessions, keyed by display name.
//! Registration, unregistration and fan-out all take the exclusive side of
//! one `RwLock`, so they never interleave.
//!
//! Two sessions with the same name: the last one registered wins and the
//! earlier one silently stops receiving broadcasts. This is accepted
//! behavior, not a collision error.

use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::debug;

use crate::session::Session;
use crate::types::SessionId;

/// Registry of active sessions
#[derive(Debug, Default)]
pub struct Registry {
    /// Active sessions: display name -> Session
    sessions: RwLock<HashMap<String, Session>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session under its name, replacing any previous holder
    ///
    /// Returns the replaced session, if any.
    pub async fn register(&self, session: Session) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let replaced = sessions.insert(session.name.clone(), session);
        if let Some(old) = &replaced {
            debug!("Session {} replaced under name '{}'", old.id, old.name);
        }
        replaced
    }

    /// Remove the session registered under `name`, but only if it is `id`
    ///
    /// A session that lost its name to a newer registration must not
    /// remove the newer one on disconnect. Returns true if removed.
    pub async fn unregister(&self, name: &str, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(name) {
            Some(current) if current.id == id => {
                sessions.remove(name);
                true
            }
            _ => false,
        }
    }

    /// Lock the registry for one fan-out
    ///
    /// The lock is held until the returned snapshot is dropped, so a
    /// concurrent `register` either completes before this call or waits
    /// for the whole fan-out to finish.
    pub async fn snapshot_for_broadcast(&self) -> BroadcastSnapshot<'_> {
        BroadcastSnapshot {
            guard: self.sessions.write().await,
        }
    }

    /// Number of registered sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Check if no session is registered
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Names of all registered sessions, sorted
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Exclusive view of the registry for the duration of one fan-out
pub struct BroadcastSnapshot<'a> {
    guard: RwLockWriteGuard<'a, HashMap<String, Session>>,
}

impl BroadcastSnapshot<'_> {
    /// Enqueue `msg` on every session in the snapshot
    ///
    /// Returns the number of sessions that accepted it. Sessions whose
    /// writer has terminated are skipped; they stay registered until
    /// their reader unregisters them.
    pub fn deliver(&self, msg: &str) -> usize {
        let mut delivered = 0;
        for session in self.guard.values() {
            match session.enqueue(msg.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => debug!("Skipping session {} ({}): {}", session.id, session.name, e),
            }
        }
        delivered
    }
}
