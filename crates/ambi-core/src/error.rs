// ── Core error types ──
//
// User-facing errors from ambi-core. Consumers never see HTTP status codes
// or JSON parse failures directly; the `From<ambi_api::Error>` impl folds
// transport-layer errors into the bridge's failure taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in: no session is available yet")]
    NotAuthenticated,

    // ── Remote service ───────────────────────────────────────────────
    #[error("Ambi Climate is busy, please try again later")]
    Busy,

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Whether the failure came from the remote service shedding load.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ambi_api::Error> for CoreError {
    fn from(err: ambi_api::Error) -> Self {
        match err {
            ambi_api::Error::InvalidPassword
            | ambi_api::Error::UnknownAccount
            | ambi_api::Error::Unauthorized => CoreError::AuthenticationFailed {
                message: err.to_string(),
            },
            ambi_api::Error::Busy => CoreError::Busy,
            ambi_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ambi_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ambi_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ambi_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
            ambi_api::Error::MalformedDevice { .. } => CoreError::MalformedResponse {
                message: err.to_string(),
            },
        }
    }
}
