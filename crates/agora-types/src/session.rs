//! Chat session lifecycle state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a chat session.
///
/// Sessions move `Connecting -> Open -> Closed`. A session that never
/// receives a display name moves straight from `Connecting` to `Closed`.
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Open => write!(f, "open"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "connecting" => Ok(SessionState::Connecting),
            "open" => Ok(SessionState::Open),
            "closed" => Ok(SessionState::Closed),
            other => Err(format!("invalid session state: '{other}'")),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Connecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_roundtrip() {
        for state in [
            SessionState::Connecting,
            SessionState::Open,
            SessionState::Closed,
        ] {
            let s = state.to_string();
            let parsed: SessionState = s.parse().unwrap();
            assert_eq!(state, parsed);
        }
    }

    #[test]
    fn test_session_state_rejects_unknown() {
        assert!("lurking".parse::<SessionState>().is_err());
    }

    #[test]
    fn test_default_is_connecting() {
        assert_eq!(SessionState::default(), SessionState::Connecting);
    }
}
