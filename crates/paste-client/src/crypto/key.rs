//! [`PasteKey`]: the per-paste secret carried in the URL fragment.

use std::fmt;

use rand::{distributions::Alphanumeric, rngs::OsRng, CryptoRng, Rng, RngCore};
use zeroize::Zeroize;

use super::cipher::CipherError;

/// Default number of characters in a generated key.
pub const DEFAULT_KEY_LEN: usize = 16;

/// Upper bound on key length accepted by [`PasteKey::generate`].
pub const MAX_KEY_LEN: usize = 64;

/// Alphanumeric key that encrypts a single paste.
///
/// The key is only ever placed in the fragment of the paste URL, which
/// browsers do not send to the server. Its characters are wiped from memory
/// on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PasteKey(String);

impl PasteKey {
    /// Generate a key of `len` characters from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] if `len` is zero or exceeds
    /// [`MAX_KEY_LEN`].
    pub fn generate(len: usize) -> Result<Self, CipherError> {
        Self::generate_with(&mut OsRng, len)
    }

    /// Generate a key of `len` characters from `rng`.
    pub fn generate_with<R>(rng: &mut R, len: usize) -> Result<Self, CipherError>
    where
        R: RngCore + CryptoRng,
    {
        if len == 0 || len > MAX_KEY_LEN {
            return Err(CipherError::InvalidKeyLength);
        }
        let key = (0..len)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        Ok(Self(key))
    }

    /// Parse a key copied from a paste URL fragment.
    ///
    /// A whole paste link is accepted too: everything up to and including the
    /// last `#` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] if the key is empty, too long, or
    /// contains non-alphanumeric characters.
    pub fn from_fragment(fragment: &str) -> Result<Self, CipherError> {
        let key = fragment.trim();
        let key = key.rsplit_once('#').map_or(key, |(_, k)| k);
        if key.is_empty()
            || key.len() > MAX_KEY_LEN
            || !key.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(CipherError::InvalidKey);
        }
        Ok(Self(key.to_owned()))
    }

    /// The key as it appears in the URL fragment.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key bytes fed into the key derivation function.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of characters in the key.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for PasteKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for PasteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasteKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn generated_key_has_default_length_and_alphabet() {
        let key = PasteKey::generate(DEFAULT_KEY_LEN).unwrap();
        assert_eq!(key.len(), 16);
        assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    proptest! {
        #[test]
        fn any_rng_state_yields_default_length_alphanumeric_key(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let key = PasteKey::generate_with(&mut rng, DEFAULT_KEY_LEN).unwrap();
            prop_assert_eq!(key.len(), DEFAULT_KEY_LEN);
            prop_assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }

        #[test]
        fn generated_key_parses_back_from_fragment(seed in any::<u64>(), len in 1..=MAX_KEY_LEN) {
            let mut rng = StdRng::seed_from_u64(seed);
            let key = PasteKey::generate_with(&mut rng, len).unwrap();
            let parsed = PasteKey::from_fragment(&format!("#{}", key.as_str())).unwrap();
            prop_assert_eq!(parsed, key);
        }
    }

    #[test]
    fn generated_keys_differ() {
        let a = PasteKey::generate(DEFAULT_KEY_LEN).unwrap();
        let b = PasteKey::generate(DEFAULT_KEY_LEN).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn honours_requested_length() {
        for len in [1, 7, 32, MAX_KEY_LEN] {
            assert_eq!(PasteKey::generate(len).unwrap().len(), len);
        }
    }

    #[test]
    fn rejects_zero_and_oversized_length() {
        assert!(matches!(
            PasteKey::generate(0),
            Err(CipherError::InvalidKeyLength)
        ));
        assert!(PasteKey::generate(MAX_KEY_LEN + 1).is_err());
    }

    #[test]
    fn from_fragment_strips_hash() {
        let key = PasteKey::from_fragment("#abcDEF123").unwrap();
        assert_eq!(key.as_str(), "abcDEF123");
    }

    #[test]
    fn from_fragment_accepts_full_link() {
        let key = PasteKey::from_fragment("https://paste.example/aB3#Zz09").unwrap();
        assert_eq!(key.as_str(), "Zz09");
    }

    #[test]
    fn from_fragment_rejects_garbage() {
        assert!(PasteKey::from_fragment("").is_err());
        assert!(PasteKey::from_fragment("#").is_err());
        assert!(PasteKey::from_fragment("abc/def").is_err());
        assert!(PasteKey::from_fragment("clé").is_err());
    }

    #[test]
    fn key_redacted_in_debug() {
        let key = PasteKey::from_fragment("secret123").unwrap();
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("secret123"));
    }
}
