//! Payment Gateway Client
//!
//! HTTP client for the hosted-checkout payment gateway. Orders are created
//! server side and the returned payment session id drives the checkout UI
//! on the client. Settlement status is read back with a follow-up lookup,
//! never inferred from client redirects.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const SANDBOX_BASE_URL: &str = "https://sandbox.cashfree.com/pg";
const PRODUCTION_BASE_URL: &str = "https://api.cashfree.com/pg";

/// Gateway API version header value
const API_VERSION: &str = "2022-09-01";

/// Gateway environment configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway base URL, no trailing slash
    pub base_url: String,
    /// Merchant client id
    pub client_id: String,
    /// Merchant client secret
    pub client_secret: String,
    /// API version header value
    pub api_version: String,
    /// Request timeout
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Sandbox environment credentials
    pub fn sandbox(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: SANDBOX_BASE_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_version: API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Production environment credentials
    pub fn production(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: PRODUCTION_BASE_URL.to_string(),
            ..Self::sandbox(client_id, client_secret)
        }
    }
}

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure (connect, timeout, malformed response body)
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status
    #[error("Gateway rejected request with status {status}")]
    Rejected { status: u16, body: String },
}

/// Customer details attached to a gateway order
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

/// Request body for order creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub order_id: String,
    /// Amount in minor currency units (paise)
    pub order_amount: i64,
    pub order_currency: String,
    pub customer_details: CustomerDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_note: Option<String>,
}

/// Gateway order as returned by creation and lookup
///
/// `order_status` is the gateway's raw status string ("ACTIVE", "PAID",
/// "EXPIRED", ...). Interpretation belongs to the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub order_id: String,
    pub order_status: String,
    pub order_amount: i64,
    #[serde(default)]
    pub order_currency: Option<String>,
    #[serde(default)]
    pub payment_session_id: Option<String>,
}

/// HTTP client for the payment gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Create an order and open a payment session
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .header("x-client-id", &self.config.client_id)
            .header("x-client-secret", &self.config.client_secret)
            .header("x-api-version", &self.config.api_version)
            .json(request)
            .send()
            .await?;

        Self::parse_order(response).await
    }

    /// Look up an order's current settlement status
    pub async fn get_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/orders/{}", self.config.base_url, order_id);

        let response = self
            .http
            .get(&url)
            .header("x-client-id", &self.config.client_id)
            .header("x-client-secret", &self.config.client_secret)
            .header("x-api-version", &self.config.api_version)
            .send()
            .await?;

        Self::parse_order(response).await
    }

    async fn parse_order(response: reqwest::Response) -> Result<GatewayOrder, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Gateway rejected request");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_serialization() {
        let request = CreateOrderRequest {
            order_id: "COURSE_42_1700000000000".to_string(),
            order_amount: 49900,
            order_currency: "INR".to_string(),
            customer_details: CustomerDetails {
                customer_id: "user-1".to_string(),
                customer_name: "Asha".to_string(),
                customer_email: "asha@example.com".to_string(),
                customer_phone: "9876543210".to_string(),
            },
            order_note: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""order_amount":49900"#));
        assert!(json.contains(r#""customer_phone":"9876543210""#));
        // Absent note is omitted entirely
        assert!(!json.contains("order_note"));
    }

    #[test]
    fn test_gateway_order_deserialization() {
        let json = r#"{
            "order_id": "COURSE_42_1700000000000",
            "order_status": "ACTIVE",
            "order_amount": 49900,
            "order_currency": "INR",
            "payment_session_id": "session_abc123"
        }"#;

        let order: GatewayOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_status, "ACTIVE");
        assert_eq!(order.payment_session_id.as_deref(), Some("session_abc123"));
    }

    #[test]
    fn test_gateway_order_lookup_without_session() {
        let json = r#"{"order_id":"X","order_status":"PAID","order_amount":19900}"#;
        let order: GatewayOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_status, "PAID");
        assert!(order.payment_session_id.is_none());
        assert!(order.order_currency.is_none());
    }

    #[test]
    fn test_config_environments() {
        let sandbox = GatewayConfig::sandbox("id", "secret");
        let production = GatewayConfig::production("id", "secret");
        assert_ne!(sandbox.base_url, production.base_url);
        assert_eq!(sandbox.api_version, production.api_version);
    }
}
