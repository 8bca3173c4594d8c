//! Chat session client for Hiroba.
//!
//! - `session`: the [`SessionClient`] contract (connection lifecycle, rooms, events)
//! - `view`: chat view state built from session events
//! - `formatter` / `command` / `runner`: the terminal front-end

pub mod command;
pub mod config;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;
pub mod view;

pub use config::SessionConfig;
pub use error::SessionError;
pub use runner::run_client;
pub use session::{
    AckCallback, ChatMessage, ConnectionState, JoinedRoom, RoomId, SessionClient,
    SessionContext, SessionEvent, User, UserId,
};
pub use view::ChatView;
