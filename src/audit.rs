//! Audit records emitted once per service call.
//!
//! Storage is not this crate's concern: callers plug in an [`AuditLogger`].
//! Records only ever carry redacted payloads.

use crate::error::ClientError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Outcome of an audited call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Error details attached to a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<&ClientError> for AuditError {
    fn from(err: &ClientError) -> Self {
        Self {
            message: err.to_string(),
            code: Some(err.code().as_str().to_string()),
        }
    }
}

/// One record per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Service name
    pub service: String,
    /// Redacted request parameters
    pub request: Value,
    /// Redacted decoded response (success only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    pub status: AuditStatus,
    /// Elapsed whole milliseconds
    pub duration_ms: u64,
    /// Failure details (error only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AuditError>,
    /// When the call started
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn success(
        service: impl Into<String>,
        request: Value,
        response: Value,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            service: service.into(),
            request,
            response: Some(response),
            status: AuditStatus::Success,
            duration_ms,
            error: None,
            timestamp,
        }
    }

    pub fn failure(
        service: impl Into<String>,
        request: Value,
        error: &ClientError,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            service: service.into(),
            request,
            response: None,
            status: AuditStatus::Error,
            duration_ms,
            error: Some(error.into()),
            timestamp,
        }
    }
}

/// Receiver of audit records.
///
/// `log` is awaited before the client returns, so implementations that talk
/// to slow sinks should hand the record off rather than block on I/O.
/// Failures are the implementation's to handle; the client never sees them.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(&self, record: AuditRecord);
}

/// Audit logger writing each record as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

#[async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn log(&self, record: AuditRecord) {
        let request = record.request.to_string();
        match record.status {
            AuditStatus::Success => {
                let response = record.response.as_ref().map(Value::to_string).unwrap_or_default();
                info!(
                    target: "eccang::audit",
                    service = %record.service,
                    status = record.status.as_str(),
                    duration_ms = record.duration_ms,
                    request = %request,
                    response = %response,
                    "ECCANG call completed"
                );
            }
            AuditStatus::Error => {
                let (message, code) = record
                    .error
                    .as_ref()
                    .map(|e| (e.message.as_str(), e.code.as_deref().unwrap_or("")))
                    .unwrap_or(("", ""));
                warn!(
                    target: "eccang::audit",
                    service = %record.service,
                    status = record.status.as_str(),
                    duration_ms = record.duration_ms,
                    request = %request,
                    error = %message,
                    code = %code,
                    "ECCANG call failed"
                );
            }
        }
    }
}
