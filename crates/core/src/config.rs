use crate::error::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use url::Url;

/// Loopback address of a locally running prediction service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest edge, in pixels, of decoded previews.
pub const DEFAULT_PREVIEW_MAX_EDGE: u32 = 512;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: Url,
    pub request_timeout: Duration,
    pub preview_max_edge: u32,
}

impl Config {
    /// Loads configuration from the environment (including `.env` files).
    ///
    /// `CLASSIFIER_API_URL` wins over the legacy `REACT_APP_API_URL`.
    pub fn load() -> Result<Self> {
        ConfigBuilder::from_env().build()
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        ConfigBuilder::from_lookup(lookup).build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolves `path` relative to the base URL.
    ///
    /// A base with a sub-path (`http://host/api`) keeps that prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.api_url.clone();
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| AppError::config(format!("Invalid endpoint '{}': {}", path, e)))
    }
}

/// Collects settings; nothing is validated until [`ConfigBuilder::build`],
/// so later `with_*` calls can replace a bad environment value.
#[derive(Default, Debug)]
pub struct ConfigBuilder {
    api_url: Option<String>,
    timeout: Option<Duration>,
    timeout_secs: Option<String>,
    preview_max_edge: Option<u32>,
}

impl ConfigBuilder {
    /// Starts from the environment (including `.env` files).
    pub fn from_env() -> Self {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Starts from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            api_url: get("CLASSIFIER_API_URL").or_else(|| get("REACT_APP_API_URL")),
            timeout_secs: get("CLASSIFIER_TIMEOUT_SECS"),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.timeout_secs = None;
        self
    }

    pub fn with_preview_max_edge(mut self, edge: u32) -> Self {
        self.preview_max_edge = Some(edge);
        self
    }

    pub fn build(self) -> Result<Config> {
        let api_url = parse_api_url(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let request_timeout = match (self.timeout, self.timeout_secs.as_deref()) {
            (Some(timeout), _) => timeout,
            (None, Some(raw)) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "CLASSIFIER_TIMEOUT_SECS must be a positive integer, got '{}'",
                    raw
                ))
            })?),
            (None, None) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        if request_timeout.is_zero() {
            return Err(AppError::config("Request timeout must be greater than zero"));
        }

        let preview_max_edge = self.preview_max_edge.unwrap_or(DEFAULT_PREVIEW_MAX_EDGE);
        if preview_max_edge == 0 {
            return Err(AppError::config("Preview size must be greater than zero"));
        }

        Ok(Config {
            api_url,
            request_timeout,
            preview_max_edge,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::config(format!("Invalid API URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::config(format!(
            "API URL must use http or https, got '{}'",
            other
        ))),
    }
}
