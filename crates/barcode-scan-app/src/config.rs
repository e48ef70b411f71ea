//! Decode endpoint configuration.
//!
//! The endpoint is the only configurable value. It defaults to
//! [`DEFAULT_DECODE_ENDPOINT`] and can be overridden with
//! [`ENDPOINT_ENV_VAR`].

use barcode_scan_client::{DEFAULT_DECODE_ENDPOINT, validate_decode_endpoint};
use url::Url;

use crate::AppError;

/// Environment variable overriding the decode endpoint.
pub const ENDPOINT_ENV_VAR: &str = "BARCODE_SCAN_ENDPOINT";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Decode service URL.
    pub endpoint: Url,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`AppError::Decode`] when the override is not an http(s) URL.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// Unset or blank overrides fall back to the default endpoint.
    ///
    /// # Errors
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let raw = lookup(ENDPOINT_ENV_VAR).filter(|value| !value.trim().is_empty());
        let endpoint = validate_decode_endpoint(raw.as_deref().unwrap_or(DEFAULT_DECODE_ENDPOINT))?;
        if raw.is_some() {
            tracing::debug!(%endpoint, var = ENDPOINT_ENV_VAR, "decode endpoint overridden");
        }

        Ok(Self { endpoint })
    }
}
