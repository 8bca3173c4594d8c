//! Session configuration.

/// Default websocket endpoint of the relay server.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:8080/ws";

/// Configuration for one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// WebSocket endpoint (e.g. `ws://127.0.0.1:8080/ws`)
    pub url: String,
    /// Nickname used for rooms created or joined from this session
    pub nickname: String,
    /// Optional icon sent along with messages
    pub icon: Option<String>,
}

impl SessionConfig {
    /// Create a configuration without an icon
    pub fn new(url: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            nickname: nickname.into(),
            icon: None,
        }
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
