//! Wire protocol shared by the client and the relay server.
//!
//! Every websocket text frame is a JSON object discriminated by a `type` tag.
//! Inbound frames go through [`decode_client_frame`] / [`decode_server_frame`],
//! which validate the tag and the payload shape before anything else sees it.

mod decode;
mod frame;

pub use decode::{Decoded, ProtocolError, decode_client_frame, decode_server_frame, encode_frame};
pub use frame::{
    ClientFrame, MessagePayload, RequestId, ServerFrame, TaggedFrame, UserPayload, UserSettings,
};
