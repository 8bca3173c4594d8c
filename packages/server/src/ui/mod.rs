//! UI 層: Axum による WebSocket / HTTP エンドポイント

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
