//! Reference relay server for the Hiroba chat protocol.
//!
//! Keeps rooms in memory and relays messages and presence between the
//! websocket sessions joined to each room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
