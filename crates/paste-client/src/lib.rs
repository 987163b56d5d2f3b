//! Client-side encrypted paste submission.
//!
//! Text is encrypted locally under a freshly generated key, the ciphertext is
//! uploaded to the paste backend, and the resulting link carries the key in
//! its fragment (`/<id>#<key>`) so the server never sees it.
//!
//! - [`crypto`]: key generation and the ciphertext envelope.
//! - [`transport`]: the HTTP seam ([`transport::PasteTransport`]).
//! - [`submit`]: the submission handler ([`submit::Submitter`]).

pub mod config;
pub mod crypto;
pub mod submit;
pub mod telemetry;
pub mod transport;

pub use submit::{PasteLocation, Submitter};
