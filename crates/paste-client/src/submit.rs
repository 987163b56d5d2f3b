//! The paste submission handler: encrypt locally, upload, build the link.

use std::fmt;

use common::{PasteForm, PasteId, SubmitError};
use tracing::{debug, info};

use crate::crypto::{encrypt_text, PasteKey, DEFAULT_ITERATIONS, DEFAULT_KEY_LEN};
use crate::transport::PasteTransport;

/// Where a stored paste can be read: its server identifier plus the key that
/// only ever travels in the URL fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteLocation {
    /// Identifier assigned by the server.
    pub id: PasteId,
    /// Decryption key for the paste.
    pub key: PasteKey,
}

impl PasteLocation {
    /// Site-relative link, `/<id>#<key>`.
    pub fn path(&self) -> String {
        format!("/{}#{}", self.id, self.key.as_str())
    }

    /// Absolute link against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for PasteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Encrypts pastes and submits them through a [`PasteTransport`].
pub struct Submitter<T> {
    transport: T,
    key_length: usize,
    iterations: u32,
}

impl<T: PasteTransport> Submitter<T> {
    /// Create a submitter with the default key length and KDF cost.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            key_length: DEFAULT_KEY_LEN,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Set the number of characters in generated keys.
    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    /// Set the PBKDF2 iteration count recorded in each envelope.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encrypt `text` under a fresh key and upload it.
    ///
    /// The key is generated locally and returned in the [`PasteLocation`];
    /// only the ciphertext, the `is_code` flag and `csrf_token` are sent.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Encryption`] if the key or envelope cannot be built.
    /// - Any transport error from the upload.
    /// - [`SubmitError::InvalidIdentifier`] if the response is not a paste id.
    pub async fn submit(
        &self,
        text: &str,
        is_code: bool,
        csrf_token: &str,
    ) -> Result<PasteLocation, SubmitError> {
        let key = PasteKey::generate(self.key_length)
            .map_err(|e| SubmitError::Encryption(e.to_string()))?;
        let encr = encrypt_text(text, &key, self.iterations)
            .map_err(|e| SubmitError::Encryption(e.to_string()))?;
        debug!(
            plaintext_len = text.len(),
            envelope_len = encr.len(),
            is_code,
            "paste encrypted"
        );

        let form = PasteForm {
            encr,
            is_code,
            csrf_token: csrf_token.to_owned(),
        };
        let body = self.transport.post_paste(&form).await?;
        let id = PasteId::parse(&body)?;

        info!(paste_id = %id, is_code, "paste stored");
        Ok(PasteLocation { id, key })
    }
}
