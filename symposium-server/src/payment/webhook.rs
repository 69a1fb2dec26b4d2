//! Razorpay webhook payloads
//!
//! Only the fields the registration flow reads are modelled; everything else
//! in the event is ignored.

use serde::Deserialize;

pub const PAYMENT_CAPTURED: &str = "payment.captured";
pub const PAYMENT_FAILED: &str = "payment.failed";

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    pub payment: Option<PaymentWrapper>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentWrapper {
    pub entity: PaymentEntity,
}

#[derive(Debug, Deserialize)]
pub struct PaymentEntity {
    /// Payment id (`pay_...`)
    pub id: String,
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub amount: Option<i64>,
}

impl WebhookEvent {
    pub fn payment(&self) -> Option<&PaymentEntity> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_captured_event() {
        let raw = r#"{
            "entity": "event",
            "event": "payment.captured",
            "payload": {"payment": {"entity": {
                "id": "pay_1", "order_id": "order_1", "status": "captured",
                "amount": 50000, "currency": "INR"
            }}}
        }"#;
        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event, PAYMENT_CAPTURED);
        let payment = event.payment().unwrap();
        assert_eq!(payment.id, "pay_1");
        assert_eq!(payment.order_id.as_deref(), Some("order_1"));
        assert_eq!(payment.amount, Some(50000));
    }

    #[test]
    fn test_parse_event_without_payment() {
        let event: WebhookEvent = serde_json::from_str(r#"{"event":"order.paid"}"#).unwrap();
        assert!(event.payment().is_none());
    }
}
