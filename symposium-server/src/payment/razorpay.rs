//! Razorpay integration via REST API (no SDK dependency)

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{GatewayError, GatewayOrder, PaymentGateway, signature};
use crate::config::Config;

#[derive(Clone)]
pub struct RazorpayGateway {
    client: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
}

impl RazorpayGateway {
    pub fn new(
        api_base: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        webhook_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            webhook_secret: webhook_secret.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Self::new(
            &config.razorpay_api_base,
            &config.razorpay_key_id,
            &config.razorpay_key_secret,
            &config.razorpay_webhook_secret,
            Duration::from_secs(config.gateway_timeout_secs),
        )
    }
}

/// Pull a readable message out of a Razorpay error body
fn error_message(body: &Value) -> String {
    body["error"]["description"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let resp = self
            .client
            .post(format!("{}/v1/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": amount_minor,
                "currency": currency,
                "receipt": receipt,
                "payment_capture": 1,
            }))
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;

        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_value(body.clone())
            .map_err(|e| GatewayError::InvalidResponse(format!("{e}: {body}")))
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let payload = signature::payment_payload(order_id, payment_id);
        signature::verify(&self.key_secret, payload.as_bytes(), signature)
    }

    fn verify_webhook_signature(&self, raw_body: &[u8], signature: &str) -> bool {
        signature::verify(&self.webhook_secret, raw_body, signature)
    }
}
