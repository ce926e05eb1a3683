// ── Session lifecycle ──
//
// Holds the current login session behind an `ArcSwap` so every request
// loads the freshest credentials without locking. A refresh swaps in a
// whole new `Session`; nothing ever mutates one in place.

use std::sync::Arc;

use ambi_api::{AmbiClient, Session};
use arc_swap::ArcSwap;
use secrecy::SecretString;
use tracing::{error, info};

use crate::error::CoreError;

/// Owns the API client and the session it authenticates with.
pub struct SessionManager {
    client: AmbiClient,
    email: String,
    password: SecretString,
    session: ArcSwap<Session>,
}

impl SessionManager {
    pub fn new(client: AmbiClient, email: impl Into<String>, password: SecretString) -> Self {
        Self {
            client,
            email: email.into(),
            password,
            session: ArcSwap::from_pointee(Session::empty()),
        }
    }

    pub fn client(&self) -> &AmbiClient {
        &self.client
    }

    /// The session to use for the next request.
    ///
    /// Callers load this immediately before each request and never hold it
    /// across a refresh boundary.
    pub fn session(&self) -> Arc<Session> {
        self.session.load_full()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.session.load().is_empty()
    }

    /// Log in with the configured credentials and replace the session.
    ///
    /// On failure the previous session is left in place and the error is
    /// logged before being returned. No retry.
    pub async fn login(&self) -> Result<(), CoreError> {
        match self.client.login(&self.email, &self.password).await {
            Ok(session) => {
                info!(user_id = %session.user_id, "logged in to Ambi Climate");
                self.session.store(Arc::new(session));
                Ok(())
            }
            Err(e) => {
                match &e {
                    ambi_api::Error::InvalidPassword => {
                        error!("Invalid password, please check.");
                    }
                    ambi_api::Error::UnknownAccount => {
                        error!(email = %self.email, "Invalid email, please check.");
                    }
                    other => error!(error = %other, "login failed"),
                }
                Err(e.into())
            }
        }
    }

    /// Drop the current session.
    pub fn reset(&self) {
        self.session.store(Arc::new(Session::empty()));
    }
}
