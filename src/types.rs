//! Session identity
//!
//! The registry is keyed by display name, and display names may repeat.
//! `SessionId` tells two sessions apart when they share a name.

use std::fmt;

use uuid::Uuid;

/// Identity of one accepted connection, fixed for its lifetime
///
/// Never shown on the wire. `Registry::unregister` compares it so that a
/// session replaced under its name cannot remove its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID, for correlating log lines
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable
        write!(f, "{}", &self.0.simple().to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_sharing_a_name_get_distinct_ids() {
        let ids: Vec<SessionId> = (0..100).map(|_| SessionId::new()).collect();
        for (i, a) in ids.iter().enumerate() {
            assert!(ids[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn test_display_is_short_uuid_prefix() {
        let id = SessionId::new();
        let shown = id.to_string();

        assert_eq!(shown.len(), 8);
        assert!(id.as_uuid().simple().to_string().starts_with(&shown));
    }
}
