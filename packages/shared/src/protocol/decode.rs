//! Boundary decoding: raw text → validated frame.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use super::frame::{ClientFrame, ServerFrame, TaggedFrame};

/// Protocol-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON, lacks a `type` tag, or its payload does not
    /// match the shape declared for its tag
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A frame could not be serialized
    #[error("Failed to encode frame: {0}")]
    Encode(String),
}

/// Result of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    /// A frame with a recognized tag and a valid payload
    Frame(T),
    /// A well-formed frame whose tag this side does not know
    Unknown(String),
}

fn decode<T>(text: &str) -> Result<Decoded<T>, ProtocolError>
where
    T: DeserializeOwned + TaggedFrame,
{
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProtocolError::MalformedPayload(format!("invalid JSON: {}", e)))?;

    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolError::MalformedPayload("missing 'type' tag".to_string()))?
        .to_string();

    if !T::TAGS.contains(&tag.as_str()) {
        return Ok(Decoded::Unknown(tag));
    }

    let frame: T = serde_json::from_value(value)
        .map_err(|e| ProtocolError::MalformedPayload(format!("'{}': {}", tag, e)))?;
    frame.validate()?;

    Ok(Decoded::Frame(frame))
}

/// Decode a frame received by the client.
pub fn decode_server_frame(text: &str) -> Result<Decoded<ServerFrame>, ProtocolError> {
    decode(text)
}

/// Decode a frame received by the server.
pub fn decode_client_frame(text: &str) -> Result<Decoded<ClientFrame>, ProtocolError> {
    decode(text)
}

/// Serialize a frame to its JSON text form.
pub fn encode_frame<T: Serialize>(frame: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(frame).map_err(|e| ProtocolError::Encode(e.to_string()))
}
