//! Paste key generation and envelope encryption.
//!
//! This module is intentionally free of HTTP dependencies.
//!
//! # Envelope format
//!
//! ```text
//! {"v":1,"cipher":"aes","mode":"gcm-siv","ks":256,"ts":128,
//!  "iter":<pbkdf2 rounds>,"salt":<b64>,"iv":<b64>,"ct":<b64(ciphertext+tag)>}
//! ```
//!
//! The plaintext sealed inside is `base64(utf8(text))`.

pub mod cipher;
pub mod key;

pub use cipher::{decrypt_text, encrypt_text, CipherError, Envelope, DEFAULT_ITERATIONS};
pub use key::{PasteKey, DEFAULT_KEY_LEN, MAX_KEY_LEN};
