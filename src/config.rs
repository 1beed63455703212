//! Configuration management for geth-cli
//!
//! Settings come from an optional TOML file (path in `GETH_CLI_CONFIG`) with
//! environment variable substitution. `ENDPOINT` overrides the node URL.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Public node used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://120.79.149.59:8545";

/// BZZ token contract
pub const DEFAULT_TOKEN_CONTRACT: &str = "0x2ac3c1d3e24b45c6c310534bc2dd84b5ed576335";

lazy_static! {
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid placeholder pattern");
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub node: NodeConfig,
    pub token: TokenConfig,
    pub replace: ReplaceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub contract_address: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_TOKEN_CONTRACT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplaceConfig {
    /// Pause after each successful replacement submission
    pub submission_delay_ms: u64,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            submission_delay_ms: 1_000,
        }
    }
}

impl Settings {
    /// Load settings from the environment
    pub fn load() -> Result<Self> {
        let settings = match env::var("GETH_CLI_CONFIG") {
            Ok(path) => Self::load_from(PathBuf::from(path))?,
            Err(_) => Self::default(),
        };

        let settings = settings.with_endpoint_override(env::var("ENDPOINT").ok());
        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&config_str)
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config_str = substitute_env_vars(input);

        toml::from_str(&config_str).with_context(|| "Failed to parse configuration")
    }

    /// Replace the node endpoint when an override is set and non-empty
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.node.endpoint = endpoint;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.node.endpoint.trim();
        if endpoint.is_empty() {
            anyhow::bail!("Node endpoint must not be empty");
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!("Node endpoint must be an http(s) URL: {}", endpoint);
        }
        if self.node.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than zero");
        }

        crate::tx::parse_address("token.contract_address", &self.token.contract_address)
            .with_context(|| "Invalid token contract address")?;

        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();

    for cap in ENV_VAR_PATTERN.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
