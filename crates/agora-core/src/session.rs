//! Per-connection chat session state machine.
//!
//! A session wraps one participant's join/post/leave lifecycle:
//! `Connecting -> Open -> Closed`. Opening requires a non-empty display
//! name; a session that never receives one closes without any broadcast
//! side effects. While open, each inbound message is escaped and published
//! to the chat channel. Closing publishes the leave line exactly once;
//! `Closed` is terminal.

use std::sync::Arc;

use agora_types::error::ChatError;
use agora_types::participant::{ConnectionId, Participant};
use agora_types::session::SessionState;

use crate::bus::{ChannelBus, Subscription};
use crate::escape::html_escape;
use crate::registry::ConnectionRegistry;

/// The channel all chat traffic fans out on.
pub const CHAT_CHANNEL: &str = "chat";

/// Result of a successful `Connecting -> Open` transition.
pub struct Welcome {
    /// The session's subscription to the chat channel.
    pub subscription: Subscription,
    /// Private greeting for this connection only -- never broadcast.
    pub greeting: String,
}

/// One participant's chat session.
pub struct ChatSession {
    connection_id: ConnectionId,
    participant: Option<Participant>,
    state: SessionState,
    bus: Arc<ChannelBus>,
    registry: Arc<ConnectionRegistry>,
}

impl ChatSession {
    /// Create a session in the `Connecting` state.
    pub fn new(bus: Arc<ChannelBus>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            connection_id: ConnectionId::new(),
            participant: None,
            state: SessionState::Connecting,
            bus,
            registry,
        }
    }

    /// Drive `Connecting -> Open`.
    ///
    /// A missing or empty (after trimming) name fails the transition and
    /// moves the session straight to `Closed` with no broadcast. Otherwise
    /// the name is escaped once, the session subscribes to the chat channel,
    /// the join line is published to everyone (the joiner included), and the
    /// private greeting is returned for the caller's own transport.
    pub fn open(&mut self, name: Option<&str>) -> Result<Welcome, ChatError> {
        if self.state != SessionState::Connecting {
            return Err(ChatError::AlreadyOpened);
        }

        let raw = name.map(str::trim).unwrap_or("");
        if raw.is_empty() {
            self.state = SessionState::Closed;
            return Err(ChatError::MissingName);
        }

        let display_name = html_escape(raw);
        let participant = Participant::with_connection_id(display_name.clone(), self.connection_id);
        self.registry.register(participant.clone());

        let subscription = self.bus.subscribe(self.connection_id, CHAT_CHANNEL);
        self.bus
            .publish(CHAT_CHANNEL, &format!("{display_name} joined the chat."));

        self.participant = Some(participant);
        self.state = SessionState::Open;
        tracing::info!(name = %display_name, connection_id = %self.connection_id, "chat session opened");

        Ok(Welcome {
            subscription,
            greeting: format!("Welcome, {display_name}!"),
        })
    }

    /// Publish one message from this participant (the `Open -> Open` self-loop).
    pub fn post(&self, text: &str) -> Result<(), ChatError> {
        if self.state != SessionState::Open {
            return Err(ChatError::NotOpen);
        }
        let Some(participant) = &self.participant else {
            return Err(ChatError::NotOpen);
        };

        self.bus.publish(
            CHAT_CHANNEL,
            &format!("{}: {}", participant.display_name, html_escape(text)),
        );
        Ok(())
    }

    /// Drive the session to `Closed`. Idempotent.
    ///
    /// The first call from `Open` unsubscribes, deregisters, and publishes
    /// the leave line exactly once to the remaining subscribers. Later calls
    /// (and calls on a session that never opened) do nothing.
    pub fn close(&mut self) {
        if self.state == SessionState::Open {
            self.bus.unsubscribe(self.connection_id, CHAT_CHANNEL);
            self.registry.deregister(&self.connection_id);
            if let Some(participant) = &self.participant {
                self.bus.publish(
                    CHAT_CHANNEL,
                    &format!("{} left the chat.", participant.display_name),
                );
                tracing::info!(name = %participant.display_name, connection_id = %self.connection_id, "chat session closed");
            }
        }
        self.state = SessionState::Closed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Escaped display name; `None` until the session has opened.
    pub fn display_name(&self) -> Option<&str> {
        self.participant.as_ref().map(|p| p.display_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Subscription;

    fn fixtures() -> (Arc<ChannelBus>, Arc<ConnectionRegistry>) {
        (
            Arc::new(ChannelBus::new()),
            Arc::new(ConnectionRegistry::new()),
        )
    }

    fn observer(bus: &Arc<ChannelBus>) -> Subscription {
        bus.subscribe(ConnectionId::new(), CHAT_CHANNEL)
    }

    fn drain(sub: &mut Subscription) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = sub.try_recv() {
            lines.push(line.to_string());
        }
        lines
    }

    #[test]
    fn open_without_name_fails_with_no_side_effects() {
        let (bus, registry) = fixtures();
        let mut session = ChatSession::new(bus.clone(), registry.clone());

        let err = session.open(None).unwrap_err();
        assert!(matches!(err, ChatError::MissingName));
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(bus.subscriber_count(CHAT_CHANNEL), 0);
        assert_eq!(registry.online_count(), 0);
    }

    #[test]
    fn open_with_blank_name_fails() {
        let (bus, registry) = fixtures();
        let mut session = ChatSession::new(bus, registry);
        assert!(matches!(
            session.open(Some("   ")).unwrap_err(),
            ChatError::MissingName
        ));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn open_subscribes_and_publishes_join_once() {
        let (bus, registry) = fixtures();
        let mut watcher = observer(&bus);
        let mut session = ChatSession::new(bus.clone(), registry.clone());

        let welcome = session.open(Some("Alice")).unwrap();

        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(bus.subscriber_count(CHAT_CHANNEL), 2);
        assert!(registry.is_registered(&session.connection_id()));
        assert_eq!(drain(&mut watcher), vec!["Alice joined the chat."]);
        assert_eq!(welcome.greeting, "Welcome, Alice!");
    }

    #[test]
    fn joiner_receives_own_join_line() {
        let (bus, registry) = fixtures();
        let mut session = ChatSession::new(bus, registry);
        let mut welcome = session.open(Some("Alice")).unwrap();
        assert_eq!(
            welcome.subscription.try_recv().as_deref(),
            Some("Alice joined the chat.")
        );
    }

    #[test]
    fn welcome_greeting_is_not_broadcast() {
        let (bus, registry) = fixtures();
        let mut watcher = observer(&bus);
        let mut session = ChatSession::new(bus, registry);

        session.open(Some("Alice")).unwrap();

        let lines = drain(&mut watcher);
        assert!(lines.iter().all(|l| !l.contains("Welcome")));
    }

    #[test]
    fn display_name_is_escaped_at_open() {
        let (bus, registry) = fixtures();
        let mut watcher = observer(&bus);
        let mut session = ChatSession::new(bus, registry);

        session.open(Some("<Bob>")).unwrap();

        assert_eq!(session.display_name(), Some("&lt;Bob&gt;"));
        assert_eq!(drain(&mut watcher), vec!["&lt;Bob&gt; joined the chat."]);
    }

    #[test]
    fn post_escapes_message_body() {
        let (bus, registry) = fixtures();
        let mut watcher = observer(&bus);
        let mut session = ChatSession::new(bus, registry);
        session.open(Some("Alice")).unwrap();
        drain(&mut watcher);

        session.post("<script>").unwrap();

        assert_eq!(drain(&mut watcher), vec!["Alice: &lt;script&gt;"]);
    }

    #[test]
    fn escaping_is_applied_exactly_once_through_the_pipeline() {
        let (bus, registry) = fixtures();
        let mut watcher = observer(&bus);
        let mut session = ChatSession::new(bus, registry);
        session.open(Some("Alice")).unwrap();
        drain(&mut watcher);

        let input = "5 < 6 & 7 > 2";
        session.post(input).unwrap();

        let lines = drain(&mut watcher);
        assert_eq!(lines, vec![format!("Alice: {}", html_escape(input))]);
    }

    #[test]
    fn post_before_open_is_rejected() {
        let (bus, registry) = fixtures();
        let session = ChatSession::new(bus, registry);
        assert!(matches!(session.post("hi").unwrap_err(), ChatError::NotOpen));
    }

    #[test]
    fn post_after_close_is_rejected() {
        let (bus, registry) = fixtures();
        let mut session = ChatSession::new(bus, registry);
        session.open(Some("Alice")).unwrap();
        session.close();
        assert!(matches!(session.post("hi").unwrap_err(), ChatError::NotOpen));
    }

    #[test]
    fn close_publishes_leave_exactly_once() {
        let (bus, registry) = fixtures();
        let mut watcher = observer(&bus);
        let mut session = ChatSession::new(bus.clone(), registry.clone());
        session.open(Some("Alice")).unwrap();
        drain(&mut watcher);

        session.close();
        session.close();

        assert_eq!(drain(&mut watcher), vec!["Alice left the chat."]);
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(bus.subscriber_count(CHAT_CHANNEL), 1);
        assert_eq!(registry.online_count(), 0);
    }

    #[test]
    fn close_before_open_broadcasts_nothing() {
        let (bus, registry) = fixtures();
        let mut watcher = observer(&bus);
        let mut session = ChatSession::new(bus, registry);

        session.close();

        assert!(drain(&mut watcher).is_empty());
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn reopening_a_closed_session_is_rejected() {
        let (bus, registry) = fixtures();
        let mut session = ChatSession::new(bus, registry);
        session.open(Some("Alice")).unwrap();
        session.close();
        assert!(matches!(
            session.open(Some("Alice")).unwrap_err(),
            ChatError::AlreadyOpened
        ));
    }

    #[test]
    fn disconnected_peer_misses_subsequent_messages() {
        let (bus, registry) = fixtures();
        let mut a = ChatSession::new(bus.clone(), registry.clone());
        let mut a_welcome = a.open(Some("A")).unwrap();
        let mut b = ChatSession::new(bus.clone(), registry.clone());
        let mut b_welcome = b.open(Some("B")).unwrap();
        drain(&mut a_welcome.subscription);
        drain(&mut b_welcome.subscription);

        a.close();
        b.post("hi").unwrap();

        let b_lines = drain(&mut b_welcome.subscription);
        assert!(b_lines.contains(&"B: hi".to_string()));
        // A was unsubscribed before the leave line was published, so its
        // queue holds nothing after the disconnect.
        assert!(drain(&mut a_welcome.subscription).is_empty());
    }
}
