//! # Runtime Configuration Module
//!
//! Environment variable based defaults for the scheme factory.
//!
//! ## Environment Variables
//!
//! ### `BRRTR_API_KEY_NAME`
//!
//! Header, query parameter or cookie name used by
//! [`ApiKeyAuth::from_config`](crate::security::ApiKeyAuth::from_config).
//!
//! Default: `X-API-Key`
//!
//! ### `BRRTR_API_KEY_IN`
//!
//! Where the API key is carried: `header`, `query` or `cookie`.
//! Unrecognised values fall back to `header`.
//!
//! Default: `header`
//!
//! ## Usage
//!
//! ```rust
//! use brrtrouter_auth::runtime_config::RuntimeConfig;
//! use brrtrouter_auth::security::{api_key, ApiKeyAuth};
//!
//! let config = RuntimeConfig::from_env();
//! let scheme = api_key(ApiKeyAuth::from_config(&config));
//! println!("API key scheme: {}", scheme.id());
//! ```

use crate::security::{ApiKeyLocation, DEFAULT_API_KEY_NAME};
use std::env;
use tracing::warn;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Default API key name (default: `X-API-Key`)
    pub api_key_name: String,
    /// Default API key location (default: header)
    pub api_key_location: ApiKeyLocation,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_key_name: DEFAULT_API_KEY_NAME.to_string(),
            api_key_location: ApiKeyLocation::Header,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("BRRTR_API_KEY_NAME").ok(),
            env::var("BRRTR_API_KEY_IN").ok(),
        )
    }

    fn from_vars(name: Option<String>, location: Option<String>) -> Self {
        let defaults = Self::default();

        let api_key_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or(defaults.api_key_name);

        let api_key_location = match location {
            Some(raw) => raw.parse::<ApiKeyLocation>().unwrap_or_else(|err| {
                warn!(value = %raw, error = %err, "Invalid BRRTR_API_KEY_IN, using header");
                defaults.api_key_location
            }),
            None => defaults.api_key_location,
        };

        RuntimeConfig {
            api_key_name,
            api_key_location,
        }
    }
}
