//! Code shared by the hiroba client and the reference relay server.
//!
//! - `logger`: tracing subscriber setup for the binaries
//! - `time`: clock abstraction and timestamp formatting
//! - `protocol`: websocket frames and the boundary decoder

pub mod logger;
pub mod protocol;
pub mod time;
