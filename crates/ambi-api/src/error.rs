use thiserror::Error;

/// Top-level error type for the `ambi-api` crate.
///
/// Covers every failure mode of the vendor REST API: authentication,
/// transport, the interstitial "busy" page, and response shape mismatches.
/// `ambi-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected with HTTP 401: the password is wrong.
    #[error("Invalid password, please check")]
    InvalidPassword,

    /// Login rejected with HTTP 404: no account with that email.
    #[error("Invalid email, please check")]
    UnknownAccount,

    /// An authenticated request was rejected (token expired or never issued).
    #[error("Request rejected: session token is missing or expired")]
    Unauthorized,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API answered with an interstitial challenge page instead of JSON.
    #[error("API is busy, please try again later")]
    Busy,

    /// Any other non-success HTTP status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A device entry parsed as JSON but lacks a field we rely on.
    #[error("Malformed device entry {device_id:?}: missing {field}")]
    MalformedDevice { device_id: String, field: &'static str },
}

impl Error {
    /// Returns `true` for the two login rejections (bad password / bad account).
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidPassword | Self::UnknownAccount | Self::Unauthorized
        )
    }

    /// Returns `true` if the API answered with its interstitial busy page.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Returns `true` if the response could not be mapped onto the expected shape.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Deserialization { .. } | Self::MalformedDevice { .. }
        )
    }
}
