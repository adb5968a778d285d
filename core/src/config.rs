//! Client configuration: credentials, endpoint and timeouts.

use std::fmt;
use std::time::Duration;

/// Public endpoint used when no base URL override is given.
pub const DEFAULT_BASE_URL: &str = "https://dadata.ru/api/v2";

/// Connect and total timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Immutable settings shared by `DaDataClient` and `UreqTransport`.
///
/// `Debug` never prints the token or the secret.
#[derive(Clone)]
pub struct ClientConfig {
    token: String,
    secret: String,
    base_url: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Upper bound for the whole round trip, connect included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> String {
        format!("dadata-rust-sdk/v{}", env!("CARGO_PKG_VERSION"))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_service() {
        let config = ClientConfig::new("token", "secret");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("t", "s").with_base_url("http://localhost:3000/");
        assert_eq!(config.base_url(), "http://localhost:3000");
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = ClientConfig::new("very-secret-token", "very-secret-key");
        let printed = format!("{config:?}");
        assert!(!printed.contains("very-secret-token"));
        assert!(!printed.contains("very-secret-key"));
        assert!(printed.contains("dadata.ru"));
    }

    #[test]
    fn user_agent_carries_version() {
        let agent = ClientConfig::new("t", "s").user_agent();
        assert!(agent.starts_with("dadata-rust-sdk/v"));
        assert!(agent.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
