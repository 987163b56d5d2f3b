//! [`HttpTransport`]: hyper client talking to a real paste backend.
//!
//! Plain `http://` and `https://` servers are both supported; TLS uses rustls
//! with the ring provider and the webpki root store.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use common::protocol::{truncate, CSRF_COOKIE_NAME, FORM_CONTENT_TYPE, UPLOAD_PATH};
use common::{PasteForm, SubmitError};
use http_body_util::{BodyExt, Full};
use hyper::{
    header::{HeaderMap, ACCEPT, CONTENT_TYPE, COOKIE, REFERER},
    Method, Request, StatusCode, Uri,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tracing::debug;

use super::{cookie::find_set_cookie, PasteTransport};

/// Maximum number of characters of a rejection body kept in the error.
const REJECTION_BODY_LIMIT: usize = 200;

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Production [`PasteTransport`] backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpTransport {
    client: HyperClient,
    /// Server origin without a trailing slash, e.g. `https://paste.example`.
    base_url: String,
    upload_path: String,
    csrf_cookie_name: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for the server at `server_url`.
    ///
    /// Uses the default upload path (`/p`) and CSRF cookie name
    /// (`csrftoken`).
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Transport`] if `server_url` is not an absolute
    /// `http`/`https` URL or the TLS configuration cannot be built.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, SubmitError> {
        let base_url = server_url.trim().trim_end_matches('/').to_owned();
        let uri: Uri = base_url
            .parse()
            .map_err(|e| SubmitError::Transport(format!("invalid server URL {base_url:?}: {e}")))?;
        if !matches!(uri.scheme_str(), Some("http" | "https")) || uri.host().is_none() {
            return Err(SubmitError::Transport(format!(
                "server URL must be an absolute http(s) URL, got {base_url:?}"
            )));
        }

        let https = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
            .map_err(|e| SubmitError::Transport(format!("failed to configure TLS: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            client,
            base_url,
            upload_path: UPLOAD_PATH.into(),
            csrf_cookie_name: CSRF_COOKIE_NAME.into(),
            timeout,
        })
    }

    /// Override the upload endpoint path.
    pub fn with_upload_path(mut self, path: impl Into<String>) -> Self {
        self.upload_path = path.into();
        self
    }

    /// Override the name of the anti-forgery cookie.
    pub fn with_csrf_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.csrf_cookie_name = name.into();
        self
    }

    /// Server origin the transport talks to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn uri(&self, path: &str) -> Result<Uri, SubmitError> {
        format!("{}{}", self.base_url, path)
            .parse()
            .map_err(|e| SubmitError::Transport(format!("invalid request URI: {e}")))
    }

    /// Send `req` and read the whole response, bounded by the timeout.
    async fn exchange(
        &self,
        req: Request<Full<Bytes>>,
    ) -> Result<(StatusCode, HeaderMap, String), SubmitError> {
        let round_trip = async {
            let resp = self
                .client
                .request(req)
                .await
                .map_err(|e| SubmitError::Transport(error_chain(&e)))?;
            let (parts, body) = resp.into_parts();
            let bytes = body
                .collect()
                .await
                .map_err(|e| {
                    SubmitError::Transport(format!("failed to read response body: {e}"))
                })?
                .to_bytes();
            Ok::<_, SubmitError>((
                parts.status,
                parts.headers,
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };

        tokio::time::timeout(self.timeout, round_trip)
            .await
            .map_err(|_| SubmitError::Timeout(self.timeout.as_secs()))?
    }
}

#[async_trait]
impl PasteTransport for HttpTransport {
    async fn fetch_csrf_token(&self) -> Result<Option<String>, SubmitError> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(self.uri("/")?)
            .header(ACCEPT, "text/html")
            .body(Full::new(Bytes::new()))
            .map_err(|e| SubmitError::Transport(format!("failed to build request: {e}")))?;

        let (status, headers, text) = self.exchange(req).await?;
        debug!(status = status.as_u16(), "fetched landing page for CSRF cookie");
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body: truncate(text.trim(), REJECTION_BODY_LIMIT),
            });
        }
        Ok(find_set_cookie(&headers, &self.csrf_cookie_name))
    }

    async fn post_paste(&self, form: &PasteForm) -> Result<String, SubmitError> {
        let body = form.to_urlencoded()?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri(&self.upload_path)?)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, "text/plain, */*; q=0.01")
            .header(COOKIE, format!("{}={}", self.csrf_cookie_name, form.csrf_token))
            .header(REFERER, format!("{}/", self.base_url))
            .header("x-requested-with", "XMLHttpRequest")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| SubmitError::Transport(format!("failed to build request: {e}")))?;

        let (status, _, text) = self.exchange(req).await?;
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body: truncate(text.trim(), REJECTION_BODY_LIMIT),
            });
        }
        Ok(text)
    }
}

/// Render an error and its sources as one line.
fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}
