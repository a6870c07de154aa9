use thiserror::Error;

/// Errors from the chat session state machine.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Joining requires a non-empty display name.
    #[error("a display name is required to join the chat")]
    MissingName,

    /// The session is not in the `Open` state.
    #[error("session is not open")]
    NotOpen,

    /// `open` was called on a session that already left `Connecting`.
    #[error("session was already opened")]
    AlreadyOpened,
}

/// Errors from the document rendering collaborators.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document id: '{0}'")]
    InvalidId(String),
}
