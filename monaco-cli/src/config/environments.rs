//! Environments file
//!
//! ```toml
//! [environments.production]
//! url = "https://abc123.live.dynatrace.com"
//! token-name = "PROD_TOKEN"
//! timeout-secs = 60
//! ```
//!
//! Tokens are never stored in the file; `token-name` names the environment
//! variable that holds the token.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::ClientConfig;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EnvironmentEntry {
    pub url: String,
    pub token_name: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvironmentsFile {
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentEntry>,
}

impl EnvironmentsFile {
    /// `<config dir>/monaco/environments.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("monaco")
            .join("environments.toml")
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse environments file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read environments file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid environments file: {}", path.display()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&EnvironmentEntry> {
        self.environments.get(name)
    }

    /// Build the client config of one environment, reading its token from the process environment
    pub fn client_config(&self, name: &str) -> Result<ClientConfig> {
        self.client_config_with(name, |key| std::env::var(key).ok())
    }

    pub fn client_config_with<F>(&self, name: &str, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let entry = self.get(name).with_context(|| {
            let known: Vec<&str> = self.names().collect();
            format!(
                "Unknown environment '{}' (known: {})",
                name,
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            )
        })?;

        entry
            .client_config(&lookup)
            .with_context(|| format!("Environment '{}' is misconfigured", name))
    }
}

impl EnvironmentEntry {
    pub fn client_config<F>(&self, lookup: &F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(self.token_name.as_str())
            .with_context(|| format!("Token variable {} is not set", self.token_name))?;

        let mut builder = ClientConfig::builder()
            .environment_url(self.url.clone())
            .token(token);
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}
