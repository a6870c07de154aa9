//! Registry of active chat participants.

use dashmap::DashMap;

use agora_types::participant::{ConnectionId, Participant};

/// Tracks every participant with an open session, bots included.
///
/// Sessions register on the `Connecting -> Open` transition and deregister
/// on entry to `Closed`. The home page reads the live count from here.
pub struct ConnectionRegistry {
    participants: DashMap<ConnectionId, Participant>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            participants: DashMap::new(),
        }
    }

    pub fn register(&self, participant: Participant) {
        self.participants
            .insert(participant.connection_id, participant);
    }

    /// Remove a participant. Idempotent; returns the entry if one existed.
    pub fn deregister(&self, connection_id: &ConnectionId) -> Option<Participant> {
        self.participants.remove(connection_id).map(|(_, p)| p)
    }

    pub fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.participants.contains_key(connection_id)
    }

    pub fn online_count(&self) -> usize {
        self.participants.len()
    }

    /// Display names of everyone currently online.
    pub fn names(&self) -> Vec<String> {
        self.participants
            .iter()
            .map(|entry| entry.value().display_name.clone())
            .collect()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("online_count", &self.online_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_deregister() {
        let registry = ConnectionRegistry::new();
        let p = Participant::new("Alice");
        let id = p.connection_id;

        registry.register(p);
        assert_eq!(registry.online_count(), 1);
        assert!(registry.is_registered(&id));

        let removed = registry.deregister(&id).unwrap();
        assert_eq!(removed.display_name, "Alice");
        assert_eq!(registry.online_count(), 0);
    }

    #[test]
    fn deregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        assert!(registry.deregister(&id).is_none());
        assert!(registry.deregister(&id).is_none());
    }

    #[test]
    fn names_lists_everyone_online() {
        let registry = ConnectionRegistry::new();
        registry.register(Participant::new("Alice"));
        registry.register(Participant::new("Bob"));

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }
}
