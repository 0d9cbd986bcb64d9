//! Stripe REST API client
//!
//! Only the handful of endpoints SafeCar needs: Checkout sessions for new
//! subscriptions, subscription cancellation and webhook signature checks.

use crate::config::StripeConfig;
use crate::domain::CheckoutSession;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a webhook signature
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Parameters for a subscription-mode Checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Our subscription id, echoed back as `client_reference_id`
    pub reference_id: String,
    pub customer_email: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;
    async fn cancel_subscription(&self, stripe_subscription_id: &str) -> Result<()>;
}

/// Stripe client backed by reqwest
#[derive(Clone)]
pub struct StripeClient {
    api_base: String,
    secret_key: String,
    http_client: Client,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            http_client,
        })
    }

    async fn check_response(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Upstream(format!(
            "Stripe {} failed: {} - {}",
            action, status, body
        )))
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);

        let mut params: Vec<(&str, &str)> = vec![
            ("mode", "subscription"),
            ("line_items[0][price]", request.price_id.as_str()),
            ("line_items[0][quantity]", "1"),
            ("success_url", request.success_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
            ("client_reference_id", request.reference_id.as_str()),
        ];
        if let Some(email) = &request.customer_email {
            params.push(("customer_email", email.as_str()));
        }

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach Stripe: {}", e)))?;

        let response = Self::check_response(response, "checkout session creation").await?;
        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse Stripe checkout session: {}", e)))
    }

    async fn cancel_subscription(&self, stripe_subscription_id: &str) -> Result<()> {
        let url = format!("{}/v1/subscriptions/{}", self.api_base, stripe_subscription_id);

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach Stripe: {}", e)))?;

        Self::check_response(response, "subscription cancellation").await?;
        Ok(())
    }
}

/// Webhook event envelope. `data.object` shape depends on `event_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// String field of `data.object`
    pub fn object_str(&self, field: &str) -> Option<&str> {
        self.data.object.get(field).and_then(|v| v.as_str())
    }

    pub fn object_i64(&self, field: &str) -> Option<i64> {
        self.data.object.get(field).and_then(|v| v.as_i64())
    }
}

/// Verify a `Stripe-Signature` header (`t=<ts>,v1=<hex>[,v1=<hex>...]`).
///
/// The signed payload is `"{t}.{body}"`. Any `v1` entry may match.
pub fn verify_webhook_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<()> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| AppError::BadRequest("Stripe signature has no timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(AppError::BadRequest(
            "Stripe signature has no v1 entry".to_string(),
        ));
    }
    if now.abs_diff(timestamp) > tolerance_secs.unsigned_abs() {
        return Err(AppError::BadRequest(
            "Stripe signature timestamp outside tolerance".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid webhook secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());

    if signatures
        .iter()
        .any(|sig| constant_time_eq(expected.as_bytes(), sig.as_bytes()))
    {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid Stripe signature".to_string()))
    }
}

/// Build a signature header for `payload`; used by tests and local tooling
pub fn sign_webhook_payload(secret: &str, payload: &[u8], timestamp: i64) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid webhook secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
