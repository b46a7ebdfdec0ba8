//! Connection configuration for the shared connection manager.

use std::time::Duration;

/// Endpoint used when none is configured.
pub const DEFAULT_URL: &str = "http://127.0.0.1:9200";

/// Basic authentication material.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Search service URL.
    pub url: String,
    /// Basic auth credentials. `None` sends unauthenticated requests.
    pub credentials: Option<Credentials>,
    /// Per-request timeout. `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
    /// Whether index handles create their bound index on first use when it
    /// does not exist yet.
    pub auto_create_index: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            credentials: None,
            request_timeout: None,
            auto_create_index: false,
        }
    }
}

impl ConnectionConfig {
    /// Create a config for the given URL. An empty URL keeps the default endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        if url.is_empty() {
            return Self::default();
        }
        Self {
            url,
            ..Self::default()
        }
    }

    /// Set basic auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enable or disable index auto-creation for handles using this connection.
    pub fn with_auto_create_index(mut self, enabled: bool) -> Self {
        self.auto_create_index = enabled;
        self
    }
}
