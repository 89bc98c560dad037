//! Delivery of envelopes to the provider.
//!
//! The client only needs "post this XML, give me the body back". Timeouts,
//! TLS and status handling belong to the transport; every failure surfaces as
//! [`ClientError::Network`].

use crate::config::EndpointConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// Posts a SOAP envelope and returns the raw response text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, envelope: String) -> Result<String, ClientError>;
}

/// `reqwest`-backed transport posting to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
    content_type: HeaderValue,
}

impl HttpTransport {
    /// Create a transport from endpoint settings.
    pub fn new(config: &EndpointConfig) -> Result<Self, ClientError> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("endpoint.base_url must not be empty".to_string()));
        }

        let content_type = HeaderValue::from_str(&config.content_type)
            .map_err(|e| ClientError::Config(format!("invalid content type: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.base_url.clone(),
            content_type,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, envelope: String) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, self.content_type.clone())
            .body(envelope)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        debug!(status = %status, url = %self.url, "ECCANG HTTP response received");

        if !status.is_success() {
            return Err(ClientError::Network(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        response.text().await.map_err(network_error)
    }
}

fn network_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Network(format!("request timed out: {}", err))
    } else {
        ClientError::Network(err.to_string())
    }
}
