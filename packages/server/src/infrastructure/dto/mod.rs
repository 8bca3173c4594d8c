//! Data Transfer Objects
//!
//! - `conversion`: ドメインモデル → WebSocket フレーム（`hiroba_shared::protocol`）
//! - `http`: HTTP API のレスポンス

pub mod conversion;
pub mod http;
