//! Error types for the chat session client.

use thiserror::Error;

use hiroba_shared::protocol::ProtocolError;

/// Session client errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Transport unavailable or closed before a response arrived
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid nickname, not connected, or rejected by the server
    #[error("Room creation failed: {0}")]
    RoomCreation(String),

    /// Invalid or unknown room id, not connected, or rejected by the server
    #[error("Room join failed: {0}")]
    RoomJoin(String),

    /// Inbound frame did not match the expected shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<ProtocolError> for SessionError {
    fn from(error: ProtocolError) -> Self {
        match error {
            ProtocolError::MalformedPayload(reason) => SessionError::MalformedPayload(reason),
            ProtocolError::Encode(reason) => SessionError::Connection(reason),
        }
    }
}
