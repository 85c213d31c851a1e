//! Client configuration with builder pattern
//!
//! A [`ClientConfig`] describes one environment connection: base URL, API
//! token and transport settings. It can be built in code, read from
//! `MONACO_*` environment variables, or taken from an environments file.

pub mod environments;

pub use environments::{EnvironmentEntry, EnvironmentsFile};

use anyhow::{Context, Result, bail};
use std::time::Duration;

pub const ENV_URL_VAR: &str = "MONACO_ENVIRONMENT_URL";
pub const ENV_TOKEN_VAR: &str = "MONACO_API_TOKEN";
pub const ENV_TIMEOUT_VAR: &str = "MONACO_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for one environment
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL without trailing slash (e.g. `https://abc123.live.dynatrace.com`)
    pub environment_url: String,
    pub token: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Log every request and response status at debug level
    pub request_logging: bool,
}

// The token never ends up in logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment_url", &self.environment_url)
            .field("token", &"***")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("request_logging", &self.request_logging)
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load from `MONACO_ENVIRONMENT_URL`, `MONACO_API_TOKEN` and
    /// `MONACO_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL_VAR).with_context(|| format!("{} is not set", ENV_URL_VAR))?;
        let token =
            lookup(ENV_TOKEN_VAR).with_context(|| format!("{} is not set", ENV_TOKEN_VAR))?;

        let mut builder = Self::builder().environment_url(url).token(token);

        if let Some(raw) = lookup(ENV_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().with_context(|| {
                format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_VAR, raw)
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

/// Builder for ClientConfig
#[derive(Debug)]
pub struct ClientConfigBuilder {
    environment_url: Option<String>,
    token: Option<String>,
    timeout: Duration,
    user_agent: String,
    request_logging: bool,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            environment_url: None,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("monaco-cli/{}", env!("CARGO_PKG_VERSION")),
            request_logging: true,
        }
    }

    pub fn environment_url(mut self, url: impl Into<String>) -> Self {
        self.environment_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Enable/disable per-request debug logging
    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<ClientConfig> {
        let url = self
            .environment_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .unwrap_or_default();
        if url.is_empty() {
            bail!("environment URL is required");
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            bail!("environment URL must start with http:// or https://, got '{}'", url);
        }

        let token = self.token.map(|t| t.trim().to_string()).unwrap_or_default();
        if token.is_empty() {
            bail!("API token for {} is empty", url);
        }

        if self.timeout.is_zero() {
            bail!("timeout must be greater than zero");
        }

        Ok(ClientConfig {
            environment_url: url,
            token,
            timeout: self.timeout,
            user_agent: self.user_agent,
            request_logging: self.request_logging,
        })
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder()
            .environment_url("https://abc.live.dynatrace.com/")
            .token("dt0c01.abc")
            .build()
            .unwrap();

        assert_eq!(config.environment_url, "https://abc.live.dynatrace.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("monaco-cli/"));
        assert!(config.request_logging);
    }

    #[test]
    fn test_builder_validation() {
        assert!(ClientConfig::builder().token("t").build().is_err());
        assert!(
            ClientConfig::builder()
                .environment_url("abc.live.dynatrace.com")
                .token("t")
                .build()
                .is_err()
        );
        assert!(
            ClientConfig::builder()
                .environment_url("https://abc.live.dynatrace.com")
                .token("   ")
                .build()
                .is_err()
        );
        assert!(
            ClientConfig::builder()
                .environment_url("https://abc.live.dynatrace.com")
                .token("t")
                .timeout(Duration::ZERO)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ClientConfig::builder()
            .environment_url("https://abc.live.dynatrace.com")
            .token("super-secret")
            .build()
            .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_URL_VAR, "https://env.example.com"),
            (ENV_TOKEN_VAR, "token"),
            (ENV_TIMEOUT_VAR, "5"),
        ]))
        .unwrap();

        assert_eq!(config.environment_url, "https://env.example.com");
        assert_eq!(config.token, "token");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_missing_or_invalid() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_TOKEN_VAR, "t")])).unwrap_err();
        assert!(err.to_string().contains(ENV_URL_VAR));

        let err = ClientConfig::from_lookup(lookup_from(&[
            (ENV_URL_VAR, "https://env.example.com"),
            (ENV_TOKEN_VAR, "t"),
            (ENV_TIMEOUT_VAR, "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_VAR));
    }
}
