//! Client configuration
//!
//! Layers, lowest to highest precedence: built-in defaults, an optional TOML file,
//! then the `FARMHAND_*` environment variables. Command-line flags are applied on
//! top by the caller.

use std::path::{Path, PathBuf};

use error_stack::ResultExt;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{APP_DIR_NAME, DEFAULT_PROXY_URL, ENV_PROXY_URL, ENV_STORE_DIR};
use crate::error::{Error, Result};

/// Pluralized domain words some backend functions wrap their payload under
const DEFAULT_UNWRAP_KEYS: &[&str] = &["farms", "workers", "chemicals", "assets", "records"];

/// Settings shared by every call made through one `RpcClient`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Proxy endpoint receiving `{function, params}` POST bodies
    pub proxy_url:   String,
    /// Directory of the persistent token store; platform data dir when unset
    pub store_dir:   Option<PathBuf>,
    /// Extra envelope keys tried after `data`, `result` and the function name
    pub unwrap_keys: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url:   DEFAULT_PROXY_URL.to_string(),
            store_dir:   None,
            unwrap_keys: DEFAULT_UNWRAP_KEYS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ClientConfig {
    /// Load defaults, then `path` if given, then the process environment
    ///
    /// The result is not validated: callers apply their own overrides first and then
    /// call `validate()`.
    ///
    /// # Errors
    /// Fails with `Configuration` when the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                debug!("Loading client config from {}", path.display());
                let text = std::fs::read_to_string(path)
                    .map_err(|e| Error::config_failed("read config file", e))
                    .attach(format!("Path: {}", path.display()))?;
                Self::from_toml_str(&text)?
            },
            None => Self::default(),
        };

        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a TOML document; missing keys keep their defaults
    ///
    /// # Errors
    /// Fails with `Configuration` on malformed TOML or unknown value types.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| error_stack::Report::new(Error::config_failed("parse config", e)))
    }

    /// Apply environment-style overrides from `lookup`
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_PROXY_URL).filter(|v| !v.is_empty()) {
            self.proxy_url = url;
        }
        if let Some(dir) = lookup(ENV_STORE_DIR).filter(|v| !v.is_empty()) {
            self.store_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Parse and check the proxy URL
    ///
    /// # Errors
    /// Fails with `Configuration` when the URL does not parse or is not http(s).
    pub fn proxy_url(&self) -> Result<Url> {
        let url = Url::parse(&self.proxy_url)
            .map_err(|e| Error::config_failed("parse proxy URL", e))
            .attach(format!("URL: {}", self.proxy_url))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(error_stack::Report::new(Error::Configuration(format!(
                "Unsupported proxy URL scheme '{scheme}': expected http or https"
            )))),
        }
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Fails with `Configuration` when the proxy URL is invalid.
    pub fn validate(&self) -> Result<()> {
        self.proxy_url().map(|_| ())
    }

    /// Directory holding the token store
    ///
    /// # Errors
    /// Fails with `Configuration` when no directory is configured and the platform
    /// has no data directory.
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.store_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                error_stack::Report::new(Error::Configuration(
                    "No platform data directory; set FARMHAND_STORE_DIR".to_string(),
                ))
            })
    }
}
