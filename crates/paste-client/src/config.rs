//! Configuration loading and validation for the paste client.
//!
//! Values come from `PASTE_*` environment variables; command-line flags
//! override them. The process exits with a clear error message if a required
//! value is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::{cipher::MAX_ITERATIONS, DEFAULT_ITERATIONS, DEFAULT_KEY_LEN, MAX_KEY_LEN};

/// Environment variable prefix, e.g. `PASTE_SERVER_URL`.
pub const ENV_PREFIX: &str = "PASTE";

/// Validated client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Origin of the paste server, e.g. `https://paste.example`. **Required.**
    pub server_url: String,

    /// Path of the upload endpoint.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Number of characters in generated keys.
    #[serde(default = "default_key_length")]
    pub key_length: usize,

    /// PBKDF2 iteration count for new envelopes.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Anti-forgery token. When unset it is requested from the server.
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// Name of the cookie the server issues the token in.
    #[serde(default = "default_csrf_cookie_name")]
    pub csrf_cookie_name: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_upload_path() -> String {
    common::protocol::UPLOAD_PATH.into()
}
fn default_key_length() -> usize {
    DEFAULT_KEY_LEN
}
fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}
fn default_csrf_cookie_name() -> String {
    common::protocol::CSRF_COOKIE_NAME.into()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

/// Values supplied on the command line that take precedence over the
/// environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--server`
    pub server_url: Option<String>,
    /// `--csrf-token`
    pub csrf_token: Option<String>,
}

impl Config {
    /// Load configuration from the environment, apply `overrides`, and
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is absent or any value is invalid.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .set_override_option("server_url", overrides.server_url.clone())
            .context("failed to apply --server override")?
            .set_override_option("csrf_token", overrides.csrf_token.clone())
            .context("failed to apply --csrf-token override")?
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration (is PASTE_SERVER_URL set?)")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        let url = self.server_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("PASTE_SERVER_URL must be an http:// or https:// URL");
        }
        if !self.upload_path.starts_with('/') {
            anyhow::bail!("PASTE_UPLOAD_PATH must start with '/'");
        }
        if self.key_length == 0 || self.key_length > MAX_KEY_LEN {
            anyhow::bail!("PASTE_KEY_LENGTH must be between 1 and {MAX_KEY_LEN}");
        }
        if self.kdf_iterations == 0 || self.kdf_iterations > MAX_ITERATIONS {
            anyhow::bail!("PASTE_KDF_ITERATIONS must be between 1 and {MAX_ITERATIONS}");
        }
        if self.csrf_cookie_name.trim().is_empty() {
            anyhow::bail!("PASTE_CSRF_COOKIE_NAME must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("PASTE_REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }

    /// Request timeout as a [`std::time::Duration`].
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            server_url: "https://paste.example".into(),
            upload_path: default_upload_path(),
            key_length: default_key_length(),
            kdf_iterations: default_kdf_iterations(),
            csrf_token: None,
            csrf_cookie_name: default_csrf_cookie_name(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_upload_path(), "/p");
        assert_eq!(default_key_length(), 16);
        assert_eq!(default_kdf_iterations(), 10_000);
        assert_eq!(default_csrf_cookie_name(), "csrftoken");
        assert_eq!(default_request_timeout(), 30);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_http_server() {
        let cfg = Config {
            server_url: "paste.example".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_upload_path() {
        let cfg = Config {
            upload_path: "p".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_key_length() {
        assert!(Config {
            key_length: 0,
            ..valid()
        }
        .validate()
        .is_err());
        assert!(Config {
            key_length: MAX_KEY_LEN + 1,
            ..valid()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn validate_rejects_zero_iterations_and_timeout() {
        assert!(Config {
            kdf_iterations: 0,
            ..valid()
        }
        .validate()
        .is_err());
        assert!(Config {
            request_timeout_secs: 0,
            ..valid()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn overrides_supply_required_server() {
        // No PASTE_* variables are set by the test harness.
        let cfg = Config::load(&Overrides {
            server_url: Some("http://127.0.0.1:8000".into()),
            csrf_token: Some("tok".into()),
        })
        .unwrap();
        assert_eq!(cfg.server_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.csrf_token.as_deref(), Some("tok"));
        assert_eq!(cfg.key_length, 16);
    }
}
