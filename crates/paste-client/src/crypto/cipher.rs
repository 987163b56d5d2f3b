//! Password-based AES-256-GCM-SIV sealing of paste bodies.
//!
//! The paste key is a short alphanumeric string, not raw key material, so it
//! is stretched with PBKDF2-HMAC-SHA256 under a random salt before use. The
//! salt, nonce and KDF cost travel with the ciphertext in an [`Envelope`],
//! which is all a reader needs besides the key.
//!
//! AES-256-GCM-SIV (RFC 8452) is used with a fresh random 96-bit nonce per
//! envelope. Nonce reuse under the same derived key would only reveal equality
//! of plaintexts, and a fresh salt per envelope already makes the derived key
//! unique.

use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroize;

use super::key::PasteKey;

/// Byte length of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce.
pub const NONCE_LEN: usize = 12;

/// Byte length of the PBKDF2 salt.
pub const SALT_LEN: usize = 8;

/// PBKDF2 iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Upper bound on the PBKDF2 iteration count, for both sealing and opening.
pub const MAX_ITERATIONS: u32 = 1_000_000;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

const CIPHER: &str = "aes";
const MODE: &str = "gcm-siv";
const KEY_BITS: u16 = 256;
const TAG_BITS: u16 = 128;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// A key of zero or excessive length was requested, or key derivation
    /// produced unusable material.
    #[error("invalid key length")]
    InvalidKeyLength,

    /// The key is not a non-empty alphanumeric string.
    #[error("invalid paste key")]
    InvalidKey,

    /// AES-GCM-SIV encryption or decryption failed.
    #[error("aead operation failed")]
    AeadFailure,

    /// The envelope is not valid JSON or a field cannot be decoded.
    #[error("invalid envelope format")]
    InvalidFormat,

    /// The envelope names a version, algorithm or cost this client does not
    /// support.
    #[error("unsupported envelope parameters: {0}")]
    UnsupportedParameters(String),

    /// The decrypted payload is not base64-wrapped UTF-8 text.
    #[error("decrypted payload is not valid text")]
    InvalidEncoding,
}

/// Self-describing ciphertext blob sent as the `encr` form field.
///
/// Serialized as JSON; binary fields are standard base64 with padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Format version.
    pub v: u8,
    /// Block cipher name.
    pub cipher: String,
    /// AEAD mode.
    pub mode: String,
    /// Key size in bits.
    pub ks: u16,
    /// Authentication tag size in bits.
    pub ts: u16,
    /// PBKDF2 iteration count.
    pub iter: u32,
    /// PBKDF2 salt.
    pub salt: String,
    /// AEAD nonce.
    pub iv: String,
    /// Ciphertext followed by the authentication tag.
    pub ct: String,
}

impl Envelope {
    /// Serialize to the JSON string carried in the upload form.
    pub fn to_json(&self) -> Result<String, CipherError> {
        serde_json::to_string(self).map_err(|_| CipherError::InvalidFormat)
    }

    /// Parse an envelope from its JSON representation.
    pub fn from_json(s: &str) -> Result<Self, CipherError> {
        serde_json::from_str(s.trim()).map_err(|_| CipherError::InvalidFormat)
    }

    fn check_parameters(&self) -> Result<(), CipherError> {
        if self.v != ENVELOPE_VERSION {
            return Err(CipherError::UnsupportedParameters(format!(
                "version {}",
                self.v
            )));
        }
        if self.cipher != CIPHER || self.mode != MODE {
            return Err(CipherError::UnsupportedParameters(format!(
                "{}-{}",
                self.cipher, self.mode
            )));
        }
        if self.ks != KEY_BITS || self.ts != TAG_BITS {
            return Err(CipherError::UnsupportedParameters(format!(
                "ks={} ts={}",
                self.ks, self.ts
            )));
        }
        check_iterations(self.iter)
    }
}

/// Encrypt `plaintext` under `key`.
///
/// A fresh salt and nonce are drawn from the OS CSPRNG on every call.
///
/// # Errors
///
/// Returns [`CipherError::UnsupportedParameters`] if `iterations` is outside
/// `1..=MAX_ITERATIONS`.
pub fn seal(key: &PasteKey, plaintext: &[u8], iterations: u32) -> Result<Envelope, CipherError> {
    check_iterations(iterations)?;

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let cipher = derive_cipher(key, &salt, iterations)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| CipherError::AeadFailure)?;

    Ok(Envelope {
        v: ENVELOPE_VERSION,
        cipher: CIPHER.into(),
        mode: MODE.into(),
        ks: KEY_BITS,
        ts: TAG_BITS,
        iter: iterations,
        salt: STANDARD.encode(salt),
        iv: STANDARD.encode(nonce_bytes),
        ct: STANDARD.encode(ciphertext),
    })
}

/// Decrypt an [`Envelope`] back to plaintext bytes.
///
/// Parameters are checked before any key derivation runs.
///
/// # Errors
///
/// Returns [`CipherError::UnsupportedParameters`] or
/// [`CipherError::InvalidFormat`] for malformed envelopes, and
/// [`CipherError::AeadFailure`] if authentication fails (wrong key or
/// tampered data).
pub fn open(key: &PasteKey, envelope: &Envelope) -> Result<Vec<u8>, CipherError> {
    envelope.check_parameters()?;

    let salt = decode_field(&envelope.salt)?;
    let nonce_bytes = decode_field(&envelope.iv)?;
    if salt.len() != SALT_LEN || nonce_bytes.len() != NONCE_LEN {
        return Err(CipherError::InvalidFormat);
    }
    let ciphertext = decode_field(&envelope.ct)?;

    let cipher = derive_cipher(key, &salt, envelope.iter)?;
    cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| CipherError::AeadFailure)
}

/// Seal `text` the way the upload form expects: UTF-8, then base64, then
/// encrypted. Returns the serialized envelope.
pub fn encrypt_text(text: &str, key: &PasteKey, iterations: u32) -> Result<String, CipherError> {
    let encoded = STANDARD.encode(text.as_bytes());
    seal(key, encoded.as_bytes(), iterations)?.to_json()
}

/// Inverse of [`encrypt_text`].
pub fn decrypt_text(envelope_json: &str, key: &PasteKey) -> Result<String, CipherError> {
    let envelope = Envelope::from_json(envelope_json)?;
    let encoded = open(key, &envelope)?;
    let encoded = String::from_utf8(encoded).map_err(|_| CipherError::InvalidEncoding)?;
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| CipherError::InvalidEncoding)?;
    String::from_utf8(bytes).map_err(|_| CipherError::InvalidEncoding)
}

fn check_iterations(iterations: u32) -> Result<(), CipherError> {
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(CipherError::UnsupportedParameters(format!(
            "iter={iterations}"
        )));
    }
    Ok(())
}

fn decode_field(value: &str) -> Result<Vec<u8>, CipherError> {
    STANDARD
        .decode(value)
        .map_err(|_| CipherError::InvalidFormat)
}

fn derive_cipher(key: &PasteKey, salt: &[u8], iterations: u32) -> Result<Aes256GcmSiv, CipherError> {
    let mut derived = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(key.as_bytes(), salt, iterations, &mut derived);
    let cipher = Aes256GcmSiv::new_from_slice(&derived).map_err(|_| CipherError::InvalidKeyLength);
    derived.zeroize();
    cipher
}
