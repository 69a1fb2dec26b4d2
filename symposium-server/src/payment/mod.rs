//! Payment gateway integration
//!
//! [`PaymentGateway`] is the seam the registration service talks to;
//! [`RazorpayGateway`] implements it over the Razorpay REST API.

pub mod razorpay;
pub mod signature;
pub mod webhook;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use razorpay::RazorpayGateway;

/// Remote order created by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor currency units (paise)
    pub amount: i64,
    pub currency: String,
}

/// Gateway call failed (network, credentials, or provider-side rejection)
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id handed to the checkout widget
    fn key_id(&self) -> &str;

    /// Create a remote order for `amount_minor` units of `currency`
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError>;

    /// Verify the checkout signature over `order_id|payment_id`
    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Verify a webhook signature over the raw request body
    fn verify_webhook_signature(&self, raw_body: &[u8], signature: &str) -> bool;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub const TEST_KEY_SECRET: &str = "test_key_secret";
    pub const TEST_WEBHOOK_SECRET: &str = "test_webhook_secret";

    /// In-process gateway: numbered orders, real HMAC verification
    #[derive(Default)]
    pub struct FakeGateway {
        pub orders_created: AtomicUsize,
        pub fail: bool,
    }

    impl FakeGateway {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn order_count(&self) -> usize {
            self.orders_created.load(Ordering::SeqCst)
        }

        /// Signature the checkout widget would return for this order/payment pair
        pub fn checkout_signature(order_id: &str, payment_id: &str) -> String {
            signature::sign(
                TEST_KEY_SECRET,
                signature::payment_payload(order_id, payment_id).as_bytes(),
            )
        }
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        fn key_id(&self) -> &str {
            "rzp_test_fake"
        }

        async fn create_order(
            &self,
            amount_minor: i64,
            currency: &str,
            _receipt: &str,
        ) -> Result<GatewayOrder, GatewayError> {
            if self.fail {
                return Err(GatewayError::Rejected {
                    status: 401,
                    message: "Authentication failed".into(),
                });
            }
            let n = self.orders_created.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(GatewayOrder {
                id: format!("order_fake{n}"),
                amount: amount_minor,
                currency: currency.to_string(),
            })
        }

        fn verify_payment_signature(&self, order_id: &str, payment_id: &str, sig: &str) -> bool {
            signature::verify(
                TEST_KEY_SECRET,
                signature::payment_payload(order_id, payment_id).as_bytes(),
                sig,
            )
        }

        fn verify_webhook_signature(&self, raw_body: &[u8], sig: &str) -> bool {
            signature::verify(TEST_WEBHOOK_SECRET, raw_body, sig)
        }
    }
}
