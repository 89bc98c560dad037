//! ECCANG logistics service client
//!
//! The provider exposes a single SOAP operation that tunnels JSON requests and
//! responses. This crate owns the wire adaptation around it.
//!
//! # Features
//!
//! - SOAP envelope construction with CDATA-embedded JSON parameters
//! - Response extraction (CDATA unwrapping, XML entity decoding, JSON parsing)
//! - Per-operation normalization of inconsistent response shapes
//! - Redacted audit records for every call, success or failure
//! - Pluggable transport and audit logger
//!
//! # Example
//!
//! ```ignore
//! use eccang_client::{EccangClient, EccangConfig};
//! use eccang_client::types::TrackNumberRequest;
//!
//! let client = EccangClient::from_config(&config)?;
//! let result = client
//!     .get_track_number(&TrackNumberRequest { reference_no: vec!["REF123".into()] })
//!     .await?;
//! ```

pub mod audit;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod redact;
pub mod transport;
pub mod types;
pub mod views;

pub use audit::{AuditLogger, AuditRecord, AuditStatus, TracingAuditLogger};
pub use client::EccangClient;
pub use config::{Credentials, EccangConfig};
pub use error::{ClientError, ErrorCode};
pub use transport::{HttpTransport, Transport};
pub use types::{AskStatus, EccangResult, Payload, Record};
