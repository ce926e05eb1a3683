// Shared transport configuration for building reqwest::Client instances.
//
// The client is rebuilt whenever the platform is reconfigured; keeping the
// builder logic here means timeout and user-agent handling live in one place.

use std::time::Duration;

/// Default base URL of the vendor REST API.
pub const DEFAULT_BASE_URL: &str = "https://rest.ambiclimate.com/";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound on a single request. The API layer never cancels on its
    /// own, so this is the only timeout a hung call is subject to.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("ambibridge/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(crate::error::Error::Transport)
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
