//! HTTP seam between the submission handler and the paste backend.
//!
//! [`PasteTransport`] is the only place side effects happen; the handler in
//! [`crate::submit`] is written against the trait so it can be driven by a
//! mock in tests and by [`HttpTransport`] in production.

pub mod cookie;
pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use common::{PasteForm, SubmitError};
use tracing::debug;

/// Sends pastes to the backend and obtains its anti-forgery token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasteTransport: Send + Sync {
    /// Ask the backend to issue a CSRF token.
    ///
    /// Returns `Ok(None)` when the backend answered but set no token cookie.
    async fn fetch_csrf_token(&self) -> Result<Option<String>, SubmitError>;

    /// POST the upload form and return the plain-text response body.
    ///
    /// Non-success statuses are reported as [`SubmitError::Rejected`].
    async fn post_paste(&self, form: &PasteForm) -> Result<String, SubmitError>;
}

/// Pick the anti-forgery token for a submission.
///
/// A configured, non-blank token wins; otherwise the backend is asked to
/// issue one.
///
/// # Errors
///
/// Returns [`SubmitError::MissingCsrfToken`] if no token is configured and
/// the backend does not set one, or the transport error from the fetch.
pub async fn resolve_csrf_token<T>(
    transport: &T,
    configured: Option<&str>,
) -> Result<String, SubmitError>
where
    T: PasteTransport + ?Sized,
{
    if let Some(token) = configured.map(str::trim).filter(|t| !t.is_empty()) {
        debug!("using configured CSRF token");
        return Ok(token.to_owned());
    }

    match transport.fetch_csrf_token().await? {
        Some(token) if !token.is_empty() => {
            debug!("obtained CSRF token from server");
            Ok(token)
        }
        _ => Err(SubmitError::MissingCsrfToken),
    }
}
