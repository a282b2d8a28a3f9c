//! `ClientConfig` and TOML loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::logger::LogLevel;

/// Environment variable overriding the API key.
pub const ENV_API_KEY: &str = "PBS_TVSS_API_KEY";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "PBS_TVSS_BASE_URL";

/// Client construction options.
///
/// Every field is optional; missing values fall back to the client defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::module_name_repetitions)]
pub struct ClientConfig {
    /// Overrides the production TVSS host.
    pub base_url: Option<Url>,
    /// Value sent in the `X-PBSAUTH` header.
    pub api_key: Option<String>,
    /// Verbosity forwarded to the logger.
    pub log_level: Option<LogLevel>,
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// Transport timeout in seconds. Unset means no client-side timeout.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Applies `PBS_TVSS_API_KEY` and `PBS_TVSS_BASE_URL` when set.
    ///
    /// # Errors
    ///
    /// Returns an error if `PBS_TVSS_BASE_URL` is not a valid URL.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(raw) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            let url = Url::parse(&raw).with_context(|| format!("invalid {ENV_BASE_URL}: {raw}"))?;
            self.base_url = Some(url);
        }
        Ok(self)
    }
}
