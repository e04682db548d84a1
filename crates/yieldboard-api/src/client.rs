// Admin API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, JSON bodies, and error-body
// decoding. Endpoint groups (products, transactions, session) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, ErrorBody};
use crate::models::MessageResponse;
use crate::transport::TransportConfig;

/// Maximum number of body characters kept in error previews.
const PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the investment-product admin API.
///
/// Owns no business logic: every method returns either the decoded body or
/// an [`Error`] describing the transport/HTTP failure. Credentials travel as
/// the session cookie stored in the client's jar after login.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AdminClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). `base_url` is the API
    /// root, e.g. `https://admin.example.com/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/{path}`.
    ///
    /// Any path prefix on the base URL is preserved.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// Send a GET request with query parameters and decode the JSON body.
    ///
    /// `None` fields in `query` must be skipped by the serializer so that
    /// absent filters never reach the backend.
    pub(crate) async fn get_with_query<T, Q>(&self, url: Url, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self.http.get(url).query(query).send().await?;
        debug!("GET {}", resp.url());
        Self::decode(resp).await
    }

    /// Send a request with a JSON body and decode the JSON response.
    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        debug!("{} {}", method, url);
        let resp = self.http.request(method, url).json(body).send().await?;
        Self::decode(resp).await
    }

    /// Send a GET request whose success needs no payload.
    pub(crate) async fn get_ack(&self, url: Url) -> Result<MessageResponse, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        Self::acknowledge(resp).await
    }

    /// Send a request with a JSON body whose success needs no payload.
    pub(crate) async fn send_ack<B>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<MessageResponse, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!("{} {}", method, url);
        let resp = self.http.request(method, url).json(body).send().await?;
        Self::acknowledge(resp).await
    }

    /// Map a response into the decoded body or a typed error.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let text = Self::success_text(resp).await?;
        serde_json::from_str(&text).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&text)),
            body: text.clone(),
        })
    }

    /// Like [`decode`](Self::decode), but any 2xx counts as success.
    ///
    /// An empty or non-JSON body (including 204) yields a message-less
    /// acknowledgement.
    async fn acknowledge(resp: reqwest::Response) -> Result<MessageResponse, Error> {
        let text = Self::success_text(resp).await?;
        if text.trim().is_empty() {
            return Ok(MessageResponse::default());
        }
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!("acknowledgement body is not a message object: {e}");
            MessageResponse::default()
        }))
    }

    /// Read the body of a 2xx response.
    ///
    /// Non-success statuses try to decode `{ "message": ... }`; bodies that
    /// are not JSON leave `body` empty so callers fall back to a generic
    /// message.
    async fn success_text(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            trace!(status = status.as_u16(), "error response body: {}", preview(&text));
            let body = serde_json::from_str::<ErrorBody>(&text).ok();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(text)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}
