// API authentication
//
// Email/password login against `UserCredential`. The API answers with a
// user id and a bearer token; both are carried in a `Session` that callers
// pass into every authenticated request.

use std::fmt;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{AmbiClient, parse_body};
use crate::error::Error;
use crate::models::LoginResponse;

/// Credentials issued by a successful login.
///
/// Never partially updated: a refresh produces a whole new `Session`.
#[derive(Clone)]
pub struct Session {
    pub user_id: String,
    pub token_id: SecretString,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token_id: SecretString) -> Self {
        Self {
            user_id: user_id.into(),
            token_id,
        }
    }

    /// The session that exists before the first successful login.
    pub fn empty() -> Self {
        Self::new("", SecretString::from(String::new()))
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_empty() || self.token_id.expose_secret().is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token_id", &"[REDACTED]")
            .finish()
    }
}

impl AmbiClient {
    /// Authenticate with email and password.
    ///
    /// `POST UserCredential` with form fields `email` and `pwd`.
    /// HTTP 401 means the password is wrong, HTTP 404 that the account does
    /// not exist; both are reported as distinct errors.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, Error> {
        let url = self.endpoint("UserCredential")?;

        debug!("logging in at {}", url);

        let resp = self
            .http()
            .post(url)
            .form(&[("email", email), ("pwd", password.expose_secret())])
            .send()
            .await
            .map_err(Error::Transport)?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => return Err(Error::InvalidPassword),
            StatusCode::NOT_FOUND => return Err(Error::UnknownAccount),
            _ => {}
        }

        let body: LoginResponse = parse_body(resp).await?;

        debug!(user_id = %body.user_id, "login successful");
        Ok(Session::new(body.user_id, SecretString::from(body.token_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_reports_empty() {
        assert!(Session::empty().is_empty());
        assert!(Session::new("user", SecretString::from(String::new())).is_empty());
        assert!(!Session::new("user", SecretString::from("tok".to_string())).is_empty());
    }

    #[test]
    fn debug_redacts_token() {
        let session = Session::new("user-1", SecretString::from("very-secret".to_string()));
        let printed = format!("{session:?}");
        assert!(printed.contains("user-1"));
        assert!(!printed.contains("very-secret"));
    }
}
