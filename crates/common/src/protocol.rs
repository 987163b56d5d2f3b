//! Request and response types exchanged with the paste backend.
//!
//! The backend accepts a urlencoded form on `POST /p` and answers with the
//! new paste's identifier as a plain-text body.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;

/// Path of the paste upload endpoint.
pub const UPLOAD_PATH: &str = "/p";

/// Name of the cookie carrying the anti-forgery token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// `Content-Type` of the upload request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

// ---------------------------------------------------------------------------
// Upload form
// ---------------------------------------------------------------------------

/// Form body for `POST /p`.
///
/// Field names are fixed by the backend; `is_code` is encoded as
/// `true`/`false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteForm {
    /// Serialized ciphertext envelope.
    pub encr: String,
    /// Whether the paste should be rendered as code.
    pub is_code: bool,
    /// Anti-forgery token proving the request belongs to a session.
    #[serde(rename = "csrfmiddlewaretoken")]
    pub csrf_token: String,
}

impl PasteForm {
    /// Encode the form as an `application/x-www-form-urlencoded` body.
    pub fn to_urlencoded(&self) -> Result<String, SubmitError> {
        serde_urlencoded::to_string(self)
            .map_err(|e| SubmitError::Transport(format!("failed to encode form: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Paste identifier
// ---------------------------------------------------------------------------

/// Identifier the backend assigned to a stored paste.
///
/// Only `[A-Za-z0-9_.-]` is accepted so the value can be placed in a URL path
/// without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PasteId(String);

impl PasteId {
    /// Parse the plain-text body returned by the upload endpoint.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidIdentifier`] if the trimmed body is empty,
    /// is made only of dots, or contains characters outside the allowed set.
    pub fn parse(body: &str) -> Result<Self, SubmitError> {
        let id = body.trim();
        // `.` and `..` are path segments, not names.
        let valid = !id.is_empty()
            && !id.chars().all(|c| c == '.')
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        if !valid {
            return Err(SubmitError::InvalidIdentifier(truncate(id, 64)));
        }
        Ok(Self(id.to_owned()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncate `s` to at most `max` characters for inclusion in error messages.
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_owned(),
    }
}
