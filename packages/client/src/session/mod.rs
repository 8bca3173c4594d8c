//! Chat session client.
//!
//! A [`SessionClient`] owns one websocket connection, translates inbound
//! frames into [`SessionEvent`]s and exposes the outbound operations of a
//! single caller: create/join a room, send messages and typing signals.

mod client;
mod context;
mod dispatch;
mod event;
mod pending;
mod state;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use client::SessionClient;
pub use context::SessionContext;
pub use event::{ChatMessage, JoinedRoom, RoomId, SessionEvent, User, UserId};
pub use pending::{AckCallback, MAX_PENDING_ACKS};
pub use state::ConnectionState;

/// Lock a session mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
