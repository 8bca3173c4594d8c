//! Connection state machine.
//!
//! `Disconnected -> Connecting -> Ready -> Closed`. A session may also go
//! straight to `Closed` from `Disconnected` (torn down before connecting) or
//! from `Connecting` (the attempt failed). `Closed` is terminal.

use std::fmt;

/// Lifecycle state of the session's connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Ready,
    Closed,
}

impl ConnectionState {
    /// `true` only in the state from which requests and sends are accepted.
    pub fn is_ready(self) -> bool {
        matches!(self, ConnectionState::Ready)
    }

    /// `true` once the session can no longer be used.
    pub fn is_closed(self) -> bool {
        matches!(self, ConnectionState::Closed)
    }

    /// Check whether moving from `self` to `next` is a legal transition.
    ///
    /// `Closed -> Closed` is allowed so that teardown stays idempotent.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Disconnected, Closed)
                | (Connecting, Ready)
                | (Connecting, Closed)
                | (Ready, Closed)
                | (Closed, Closed)
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}
