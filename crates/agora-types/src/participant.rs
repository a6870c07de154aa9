//! Chat participant identity types.
//!
//! A `Participant` pairs a display name with an opaque `ConnectionId`.
//! Display names are HTML-escaped by the session layer before they are
//! stored here; a `Participant` therefore always holds broadcast-safe text.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for a single chat connection.
///
/// Backed by a UUID v7 so ids sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh connection id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A chat participant: one connection with a display name.
///
/// Created at connection open (or bot spawn), immutable for the session's
/// duration, discarded when the session closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Broadcast-safe (already escaped) display name.
    pub display_name: String,
    pub connection_id: ConnectionId,
}

impl Participant {
    /// Create a participant with a fresh connection id.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            connection_id: ConnectionId::new(),
        }
    }

    /// Create a participant bound to an existing connection id.
    pub fn with_connection_id(display_name: impl Into<String>, connection_id: ConnectionId) -> Self {
        Self {
            display_name: display_name.into(),
            connection_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn participant_keeps_given_connection_id() {
        let id = ConnectionId::new();
        let p = Participant::with_connection_id("Alice", id);
        assert_eq!(p.connection_id, id);
        assert_eq!(p.display_name, "Alice");
    }

    #[test]
    fn connection_id_serde_roundtrip() {
        let id = ConnectionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ConnectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
