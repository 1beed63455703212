//! Error types for geth-cli

use ethers::providers::{ProviderError, RpcError};
use thiserror::Error;

/// Main error type for the tool
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("Decode error in {field}: {message}")]
    Decode { field: String, message: String },

    #[error("Key format error: {0}")]
    KeyFormat(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Private key belongs to {actual}, not to sender {expected}")]
    SenderMismatch { expected: String, actual: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    pub fn decode(field: impl Into<String>, message: impl ToString) -> Self {
        CliError::Decode {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Classify a provider failure for `method`.
    ///
    /// Error envelopes returned by the node become [`CliError::Node`], results that
    /// do not deserialize become [`CliError::Decode`], everything else is transport.
    pub fn from_provider(method: &str, err: ProviderError) -> Self {
        if let Some(resp) = err.as_error_response() {
            return CliError::Node {
                code: resp.code,
                message: resp.message.clone(),
            };
        }
        if let Some(serde_err) = err.as_serde_error() {
            return CliError::decode(method, serde_err);
        }
        CliError::Transport(format!("{}: {}", method, err))
    }

    /// Check if the error only concerns one pool entry
    pub fn is_per_entry_recoverable(&self) -> bool {
        matches!(
            self,
            CliError::Node { .. } | CliError::Decode { .. } | CliError::Signing(_)
        )
    }
}

/// Result type for tool operations
pub type CliResult<T> = Result<T, CliError>;
