// Vendor API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer authentication, and
// response classification. Endpoint methods live in sibling modules
// (auth, devices, control) as inherent impls to keep this module focused on
// transport mechanics.

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Session;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Substring of the interstitial challenge page the API's CDN serves when
/// it is shedding load.
const BUSY_MARKER: &str = "Just a moment...";

/// Longest body excerpt carried in error messages.
const PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the Ambi Climate REST API.
///
/// Stateless with respect to credentials: every authenticated call takes the
/// [`Session`] to use, so a caller holding an old session can never leak it
/// past a refresh. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AmbiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AmbiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, normally
    /// [`DEFAULT_BASE_URL`](crate::transport::DEFAULT_BASE_URL).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        session: &Session,
    ) -> Result<T, Error> {
        debug!("GET {}", url.path());

        let resp = self
            .http
            .get(url)
            .bearer_auth(session.token_id.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_body(resp).await
    }

    /// Send an authenticated form-encoded PUT request and decode the JSON body.
    pub(crate) async fn put_form<T: DeserializeOwned>(
        &self,
        url: Url,
        session: &Session,
        form: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("PUT {}", url.path());
        trace!(?form, "form fields");

        let resp = self
            .http
            .put(url)
            .bearer_auth(session.token_id.expose_secret())
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_body(resp).await
    }
}

/// Classify a response and decode its JSON body.
///
/// The CDN in front of the API answers overload with an HTML challenge page,
/// sometimes with a 2xx status. That page is reported as [`Error::Busy`]
/// rather than as a deserialization failure.
pub(crate) async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    if body.contains(BUSY_MARKER) {
        return Err(Error::Busy);
    }

    if !status.is_success() {
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
        } else {
            preview(&body)
        };
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
