//! Common error types shared across crates.

use thiserror::Error;

/// Failure of a paste submission.
///
/// Variants map to process exit codes (sysexits) reported by the CLI:
/// - [`SubmitError::Encryption`] → 70
/// - [`SubmitError::MissingCsrfToken`] → 78
/// - [`SubmitError::Transport`], [`SubmitError::Timeout`] → 69
/// - [`SubmitError::Rejected`], [`SubmitError::InvalidIdentifier`] → 76
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Key generation or sealing the ciphertext envelope failed.
    #[error("encryption failure: {0}")]
    Encryption(String),

    /// No anti-forgery token was configured and the server did not issue one.
    #[error("no CSRF token configured and none issued by the server")]
    MissingCsrfToken,

    /// The request could not be sent or its response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-success status.
    #[error("server rejected paste with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response body is not a usable paste identifier.
    #[error("invalid paste identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl SubmitError {
    /// Returns the process exit code that should be used for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SubmitError::Encryption(_) => 70,
            SubmitError::MissingCsrfToken => 78,
            SubmitError::Transport(_) | SubmitError::Timeout(_) => 69,
            SubmitError::Rejected { .. } | SubmitError::InvalidIdentifier(_) => 76,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(SubmitError::Encryption("x".into()).exit_code(), 70);
        assert_eq!(SubmitError::MissingCsrfToken.exit_code(), 78);
        assert_eq!(SubmitError::Transport("x".into()).exit_code(), 69);
        assert_eq!(SubmitError::Timeout(30).exit_code(), 69);
        assert_eq!(
            SubmitError::Rejected {
                status: 403,
                body: "forbidden".into()
            }
            .exit_code(),
            76
        );
        assert_eq!(SubmitError::InvalidIdentifier("".into()).exit_code(), 76);
    }

    #[test]
    fn display_includes_status_and_body() {
        let e = SubmitError::Rejected {
            status: 403,
            body: "CSRF verification failed".into(),
        };
        let s = e.to_string();
        assert!(s.contains("403"));
        assert!(s.contains("CSRF verification failed"));
    }
}
