//! Configuration types for the ECCANG client.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured base URL.
pub const ENV_BASE_URL: &str = "ECCANG_BASE_URL";
/// Environment variable overriding the configured application token.
pub const ENV_APP_TOKEN: &str = "ECCANG_APP_TOKEN";
/// Environment variable overriding the configured application key.
pub const ENV_APP_KEY: &str = "ECCANG_APP_KEY";

/// Main configuration for the ECCANG client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EccangConfig {
    /// Config version
    pub version: String,

    /// Service endpoint settings
    pub endpoint: EndpointConfig,

    /// Application credentials issued by the provider
    pub credentials: Credentials,

    /// Audit logging settings
    pub audit: AuditConfig,
}

impl Default for EccangConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            endpoint: EndpointConfig::default(),
            credentials: Credentials::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl EccangConfig {
    /// Apply `ECCANG_*` environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.endpoint.base_url = base_url;
        }
        if let Some(app_token) = lookup(ENV_APP_TOKEN) {
            self.credentials.app_token = app_token;
        }
        if let Some(app_key) = lookup(ENV_APP_KEY) {
            self.credentials.app_key = app_key;
        }
    }

    /// Reject configurations the client cannot work with.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(ClientError::Config("endpoint.base_url must not be empty".to_string()));
        }
        if self.endpoint.timeout_secs == 0 {
            return Err(ClientError::Config("endpoint.timeout_secs must be greater than zero".to_string()));
        }
        if self.credentials.app_token.is_empty() {
            return Err(ClientError::Config("credentials.app_token must not be empty".to_string()));
        }
        if self.credentials.app_key.is_empty() {
            return Err(ClientError::Config("credentials.app_key must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Web service URL the envelopes are posted to
    pub base_url: String,

    /// Request timeout enforced by the HTTP transport (seconds)
    pub timeout_secs: u64,

    /// Content-Type header sent with every envelope
    pub content_type: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 60,
            content_type: "text/xml; charset=UTF-8".to_string(),
        }
    }
}

/// Application credentials.
///
/// `Debug` masks both values so configs can be logged safely.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Application token (`appToken`)
    pub app_token: String,
    /// Application key (`appKey`)
    pub app_key: String,
}

impl Credentials {
    pub fn new(app_token: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_token: app_token.into(),
            app_key: app_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_token", &"[REDACTED]")
            .field("app_key", &"[REDACTED]")
            .finish()
    }
}

/// Audit logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Emit an audit record per call through `tracing`
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EccangConfig::default();
        assert_eq!(config.endpoint.timeout_secs, 60);
        assert_eq!(config.endpoint.content_type, "text/xml; charset=UTF-8");
        assert!(config.audit.enabled);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = EccangConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: EccangConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.endpoint.timeout_secs, config.endpoint.timeout_secs);
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
version: "1"
endpoint:
  base_url: "http://example.com/default/svc/web-service"
  timeout_secs: 15
credentials:
  app_token: "token"
  app_key: "key"
audit:
  enabled: false
"#;
        let config: EccangConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.endpoint.base_url, "http://example.com/default/svc/web-service");
        assert_eq!(config.endpoint.timeout_secs, 15);
        assert_eq!(config.endpoint.content_type, "text/xml; charset=UTF-8");
        assert_eq!(config.credentials.app_token, "token");
        assert!(!config.audit.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_APP_TOKEN, "env-token"),
            (ENV_BASE_URL, "http://override.test/ws"),
        ]);
        let mut config = EccangConfig::default();
        config.credentials.app_key = "file-key".to_string();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.endpoint.base_url, "http://override.test/ws");
        assert_eq!(config.credentials.app_token, "env-token");
        assert_eq!(config.credentials.app_key, "file-key");
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let mut config = EccangConfig::default();
        config.endpoint.base_url = "http://example.com".to_string();
        config.credentials.app_token = "token".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("app_key"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = EccangConfig::default();
        config.endpoint.base_url = "http://example.com".to_string();
        config.endpoint.timeout_secs = 0;
        config.credentials = Credentials::new("token", "key");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("timeout_secs"));

        config.endpoint.timeout_secs = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::new("secret-token", "secret-key");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret-token"));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
