//! Registration Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog;

/// Payment status of a registration
///
/// Transitions only `Pending → Paid` or `Pending → Failed`. A declined
/// checkout attempt leaves the registration `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

/// Where a persisted registration sits in the create → pay → confirm flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationState {
    /// Persisted, no gateway order yet
    Pending,
    /// Gateway order attached, awaiting payment
    OrderCreated,
    Paid,
    /// Closed for payment
    Failed,
}

/// Per-event sub-option chosen by the attendee
///
/// Both keys are required on input; their values may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(rename = "eventId")]
    pub event_id: Value,
    #[serde(rename = "subOption")]
    pub sub_option: String,
}

impl EventDetail {
    /// Catalog id this detail refers to, when it is a plain integer
    pub fn catalog_id(&self) -> Option<u64> {
        self.event_id.as_u64()
    }
}

/// Validated registration payload, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub name: String,
    pub phone: String,
    /// Trimmed and lowercased
    pub email: String,
    pub college: String,
    pub department: String,
    pub selected_events: Vec<u8>,
    pub event_details: Vec<EventDetail>,
}

impl NewRegistration {
    /// Always the length of the selected-events list
    pub fn num_events(&self) -> i64 {
        self.selected_events.len() as i64
    }
}

/// Registration entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub college: String,
    pub department: String,
    pub registration_fee: Decimal,
    pub payment_status: PaymentStatus,
    /// Gateway order id (never exposed to clients through this struct)
    #[serde(skip)]
    pub order_id: Option<String>,
    /// Gateway payment id (never exposed to clients through this struct)
    #[serde(skip)]
    pub payment_id: Option<String>,
    /// Millisecond timestamp, RFC 3339 on the wire
    #[serde(with = "crate::util::rfc3339_millis")]
    pub registration_date: i64,
    #[serde(default, with = "crate::util::option_rfc3339_millis")]
    pub payment_date: Option<i64>,
    pub num_events: i64,
    pub selected_events: Vec<u8>,
    pub event_details: Vec<EventDetail>,
}

impl Registration {
    pub fn state(&self) -> RegistrationState {
        match (self.payment_status, &self.order_id) {
            (PaymentStatus::Paid, _) => RegistrationState::Paid,
            (PaymentStatus::Failed, _) => RegistrationState::Failed,
            (PaymentStatus::Pending, Some(_)) => RegistrationState::OrderCreated,
            (PaymentStatus::Pending, None) => RegistrationState::Pending,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Selected events resolved to display names, each with the first
    /// sub-option recorded for it (empty when none)
    pub fn selected_event_names(&self) -> Vec<SelectedEventName> {
        self.selected_events
            .iter()
            .map(|&id| {
                let sub_option = self
                    .event_details
                    .iter()
                    .find(|d| d.catalog_id() == Some(u64::from(id)))
                    .map(|d| d.sub_option.clone())
                    .unwrap_or_default();
                SelectedEventName {
                    id,
                    name: catalog::event_name(id).to_string(),
                    sub_option,
                }
            })
            .collect()
    }
}

/// Selected event as shown on receipts and confirmation emails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedEventName {
    pub id: u8,
    pub name: String,
    pub sub_option: String,
}

/// Registration plus resolved event names (payment page / receipt view)
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationDetail {
    #[serde(flatten)]
    pub registration: Registration,
    pub selected_event_names: Vec<SelectedEventName>,
}

impl From<Registration> for RegistrationDetail {
    fn from(registration: Registration) -> Self {
        let selected_event_names = registration.selected_event_names();
        Self {
            registration,
            selected_event_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Registration {
        Registration {
            id: 7,
            name: "A".into(),
            phone: "9876543210".into(),
            email: "a@b.com".into(),
            college: "X".into(),
            department: "CS".into(),
            registration_fee: Decimal::new(50000, 2),
            payment_status: PaymentStatus::Pending,
            order_id: None,
            payment_id: None,
            registration_date: 1_700_000_000_000,
            payment_date: None,
            num_events: 2,
            selected_events: vec![1, 3],
            event_details: vec![EventDetail {
                event_id: json!(1),
                sub_option: "Morning".into(),
            }],
        }
    }

    #[test]
    fn test_payment_status_db_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(PaymentStatus::from_db("refunded"), None);
    }

    #[test]
    fn test_state_follows_status_and_order() {
        let mut reg = sample();
        assert_eq!(reg.state(), RegistrationState::Pending);

        reg.order_id = Some("order_1".into());
        assert_eq!(reg.state(), RegistrationState::OrderCreated);

        reg.payment_status = PaymentStatus::Paid;
        assert_eq!(reg.state(), RegistrationState::Paid);
    }

    #[test]
    fn test_selected_event_names_with_sub_options() {
        let names = sample().selected_event_names();
        assert_eq!(
            names,
            vec![
                SelectedEventName {
                    id: 1,
                    name: "AI Workshop".into(),
                    sub_option: "Morning".into(),
                },
                SelectedEventName {
                    id: 3,
                    name: "Web3 Development".into(),
                    sub_option: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_serialized_registration_hides_gateway_ids() {
        let mut reg = sample();
        reg.order_id = Some("order_secret".into());
        let json = serde_json::to_value(RegistrationDetail::from(reg)).unwrap();

        assert_eq!(json["payment_status"], "pending");
        assert_eq!(json["registration_date"], "2023-11-14T22:13:20.000Z");
        assert!(json["payment_date"].is_null());
        assert_eq!(json["registration_fee"], "500.00");
        assert_eq!(json["event_details"][0]["subOption"], "Morning");
        assert_eq!(json["selected_event_names"][0]["name"], "AI Workshop");
        assert!(json.get("order_id").is_none());
    }
}
