//! Startup configuration
//!
//! Everything comes from the process environment:
//! - `API_KEY` (required) - credential for the restoration service
//! - `PHOTO_RESTORER_MODEL` - model name, defaults to [`DEFAULT_MODEL`]
//! - `PHOTO_RESTORER_ENDPOINT` - service base URL, defaults to [`DEFAULT_ENDPOINT`]

use crate::error::{RestoreError, Result};

/// Environment variable holding the service credential
pub const API_KEY_VAR: &str = "API_KEY";
/// Environment variable overriding the model name
pub const MODEL_VAR: &str = "PHOTO_RESTORER_MODEL";
/// Environment variable overriding the service base URL
pub const ENDPOINT_VAR: &str = "PHOTO_RESTORER_ENDPOINT";

/// Image-capable Gemini model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
/// Public Gemini API host
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Resolved application configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Service credential, never logged
    pub api_key: String,
    /// Model name inserted into the request path
    pub model: String,
    /// Base URL without a trailing slash
    pub endpoint: String,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// A missing or empty `API_KEY` is a [`RestoreError::Configuration`];
    /// the caller is expected to treat it as fatal.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same parsing as [`Config::from_env`] over an arbitrary lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                RestoreError::Configuration(format!("{API_KEY_VAR} environment variable not set."))
            })?;

        let model = lookup(MODEL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let endpoint = lookup(ENDPOINT_VAR)
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Config { api_key, model, endpoint })
    }
}

// Keep the key out of logs and panic messages
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(RestoreError::Configuration(_))));
    }

    #[test]
    fn test_blank_key_is_configuration_error() {
        let result = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")]));
        assert!(matches!(result, Err(RestoreError::Configuration(_))));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            (MODEL_VAR, "custom-model"),
            (ENDPOINT_VAR, "http://localhost:8080/"),
        ]))
        .unwrap();
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::from_lookup(lookup_from(&[(API_KEY_VAR, "secret")])).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
    }
}
