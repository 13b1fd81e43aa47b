//! SMS Delivery Client
//!
//! Thin HTTP client for the transactional SMS provider that delivers
//! one-time codes. The provider exposes a GET endpoint keyed by API key
//! and addressed by the fully qualified subscriber number.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default provider endpoint
const DEFAULT_BASE_URL: &str = "https://2factor.in/API/V1";

/// SMS provider configuration
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Provider base URL, no trailing slash
    pub base_url: String,
    /// Provider API key
    pub api_key: String,
    /// Country dial prefix prepended to the subscriber number
    pub country_code: String,
    /// Request timeout
    pub timeout: Duration,
}

impl SmsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            country_code: "91".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// SMS delivery errors
#[derive(Debug, Error)]
pub enum SmsError {
    /// Transport failure (connect, timeout, malformed response body)
    #[error("SMS request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider accepted the request but refused to deliver
    #[error("SMS provider rejected the message: {0}")]
    Rejected(String),
}

/// Provider response envelope
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Details")]
    details: String,
}

/// HTTP client for the SMS provider
#[derive(Debug, Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    config: SmsConfig,
}

impl SmsClient {
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Send a one-time code to a subscriber number
    ///
    /// Returns the provider-side delivery session id on success.
    pub async fn send_code(&self, mobile_number: &str, code: &str) -> Result<String, SmsError> {
        // The URL embeds the API key, keep it out of logs.
        let url = format!(
            "{}/{}/SMS/{}{}/{}",
            self.config.base_url, self.config.api_key, self.config.country_code, mobile_number, code
        );

        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: ProviderResponse = response.json().await?;

        if body.status != "Success" {
            return Err(SmsError::Rejected(body.details));
        }

        tracing::debug!(delivery_id = %body.details, "SMS accepted by provider");
        Ok(body.details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_response_success() {
        let json = r#"{"Status":"Success","Details":"afc63d3a-7e3a-4d4b-8f0a"}"#;
        let response: ProviderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "Success");
        assert_eq!(response.details, "afc63d3a-7e3a-4d4b-8f0a");
    }

    #[test]
    fn test_provider_response_error() {
        let json = r#"{"Status":"Error","Details":"Invalid Api Key"}"#;
        let response: ProviderResponse = serde_json::from_str(json).unwrap();
        assert_ne!(response.status, "Success");
    }

    #[test]
    fn test_config_defaults() {
        let config = SmsConfig::new("test-key");
        assert_eq!(config.country_code, "91");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.base_url.ends_with('/'));
    }
}
