//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ambi_config::ConfigError;
use ambi_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const BUSY: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to Ambi Climate at {url}")]
    #[diagnostic(
        code(ambi::connection_failed),
        help(
            "Check your network connection and account.base_url.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Ambi Climate is busy")]
    #[diagnostic(
        code(ambi::busy),
        help("The service answered with its challenge page. Try again in a few minutes.")
    )]
    Busy,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ambi::auth_failed),
        help(
            "Verify account.email and the password.\n\
             Run: ambi config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for '{email}'")]
    #[diagnostic(
        code(ambi::no_credentials),
        help(
            "Store one with: ambi config set-password\n\
             Or set the AMBI_PASSWORD environment variable."
        )
    )]
    NoCredentials { email: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(ambi::not_found),
        help("Run: ambi status to see reporting devices")
    )]
    NotFound { identifier: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(ambi::api_error))]
    ApiError { status: Option<u16>, message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(code(ambi::malformed_response))]
    MalformedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ambi::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(ambi::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(ambi::config),
        help("Create a config with: ambi config init --email <EMAIL>")
    )]
    Config { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(ambi::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Busy => exit_code::BUSY,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotAuthenticated => CliError::AuthFailed {
                message: "no active session".into(),
            },
            CoreError::Busy => CliError::Busy,
            CoreError::MalformedResponse { message } => CliError::MalformedResponse { message },
            CoreError::Api { message, status } => CliError::ApiError { status, message },
            CoreError::DeviceNotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Io { source, .. } => CliError::Io(source),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { email } => CliError::NoCredentials { email },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::AuthenticationFailed {
                    message: "bad".into(),
                },
                exit_code::AUTH,
            ),
            (CoreError::Busy, exit_code::BUSY),
            (
                CoreError::DeviceNotFound {
                    identifier: "Home Attic".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::ConnectionFailed {
                    url: "https://rest.ambiclimate.com/".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::Api {
                    message: "boom".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn api_error_message_includes_status_when_known() {
        let with = CliError::ApiError {
            status: Some(502),
            message: "bad gateway".into(),
        };
        assert_eq!(with.to_string(), "API error (HTTP 502): bad gateway");

        let without = CliError::ApiError {
            status: None,
            message: "boom".into(),
        };
        assert_eq!(without.to_string(), "API error: boom");
    }
}
