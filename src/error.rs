//! Error types for the ECCANG client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ECCANG client errors.
///
/// Business-level failures (`"ask": "Failure"`) are not represented here; they
/// decode successfully and are reported through [`crate::types::EccangResult`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to serialize request parameters: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Received empty response body.")]
    EmptyResponse,

    #[error("Failed to parse ECCANG response JSON: {0}")]
    ResponseParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Serialization(_) => ErrorCode::Serialization,
            Self::Network(_) => ErrorCode::Network,
            Self::Protocol(_) => ErrorCode::Protocol,
            Self::EmptyResponse => ErrorCode::EmptyResponse,
            Self::ResponseParse(_) => ErrorCode::ResponseParse,
            Self::Config(_) => ErrorCode::Config,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Error codes attached to audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Request parameters could not be turned into JSON
    Serialization,
    /// Transport failure
    Network,
    /// No response element in the SOAP envelope
    Protocol,
    /// Response element empty after unwrapping
    EmptyResponse,
    /// Response element is not valid JSON
    ResponseParse,
    /// Invalid client configuration
    Config,
}

impl ErrorCode {
    /// Get the string code for this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Protocol => "PROTOCOL_ERROR",
            Self::EmptyResponse => "EMPTY_RESPONSE",
            Self::ResponseParse => "RESPONSE_PARSE_ERROR",
            Self::Config => "CONFIG_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
