use serde::Deserialize;
use std::path::Path;

use crate::errors::CoreError;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bearer credential attached to every request.
///
/// Supplied explicitly by whoever builds the client; nothing in the library
/// reads tokens from ambient process state.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credentials(<redacted>)")
    }
}

/// Connection settings for the back-office API.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto (e.g. `https://api.example.com/api/`).
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional bearer token.
    #[serde(default)]
    pub token: Option<Credentials>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Credentials::bearer(token));
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build from `LENDTRACK_API_URL` (required), `LENDTRACK_TOKEN` and
    /// `LENDTRACK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, CoreError> {
        let base_url = std::env::var("LENDTRACK_API_URL")
            .map_err(|_| CoreError::Config("LENDTRACK_API_URL is not set".into()))?;

        let mut config = Self::new(base_url);
        if let Ok(token) = std::env::var("LENDTRACK_TOKEN") {
            if !token.trim().is_empty() {
                config = config.with_token(token.trim());
            }
        }
        if let Ok(raw) = std::env::var("LENDTRACK_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                CoreError::Config(format!("LENDTRACK_TIMEOUT_SECS must be an integer, got '{raw}'"))
            })?;
            config = config.with_timeout_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document with `base_url`, `timeout_secs` and `token` keys.
    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(())
    }

    /// Base URL with exactly one trailing slash.
    pub fn normalized_base_url(&self) -> String {
        format!("{}/", self.base_url.trim().trim_end_matches('/'))
    }
}
