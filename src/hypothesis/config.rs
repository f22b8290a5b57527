//! Estimation server configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the causal estimation server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalServerConfig {
    /// Base URL of the server
    pub server_url: String,
    /// Session created on the server for the current dataset
    pub session_id: Option<String>,
    /// When false, schema requests are skipped
    pub server_active: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CausalServerConfig {
    fn default() -> Self {
        Self {
            server_url: std::env::var("CAUSAL_SERVER_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            session_id: std::env::var("CAUSAL_SESSION_ID")
                .ok()
                .filter(|s| !s.is_empty()),
            server_active: true,
            timeout_secs: std::env::var("CAUSAL_SERVER_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl CausalServerConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_server_active(mut self, active: bool) -> Self {
        self.server_active = active;
        self
    }

    /// `path` joined onto the server URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
