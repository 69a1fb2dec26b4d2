//! Registration orchestrator
//!
//! create → initiate_payment → confirm_payment / handle_webhook.
//!
//! The `pending → paid` transition is a single conditional UPDATE; whichever
//! of the checkout callback and the webhook gets the row back sends the
//! confirmation email, the other sees zero rows and does nothing. A
//! `payment.failed` webhook is one declined attempt: it is logged and the
//! registration stays `pending`, so a retry on the same order can complete it.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value;
use shared::models::{PaymentStatus, Registration, RegistrationDetail, RegistrationState};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::error::{RegistrationError, RegistrationResult};
use crate::db::{RepoError, registrations};
use crate::email::Notifier;
use crate::payment::PaymentGateway;
use crate::payment::webhook::{PAYMENT_CAPTURED, PAYMENT_FAILED, WebhookEvent};
use crate::validation::{self, FieldErrors};

/// Payment parameters fixed at startup
#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub registration_fee: Decimal,
    pub currency: String,
    /// Shown as the merchant name in the checkout widget
    pub site_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRegistration {
    pub registration_id: i64,
    pub registration_fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the checkout widget needs to open a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOrder {
    pub order_id: String,
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    pub key: String,
    pub name: String,
    pub description: String,
    pub prefill: Prefill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedPayment {
    pub registration_id: i64,
    /// False when the registration was already paid by an earlier call
    pub newly_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// This delivery performed `pending → paid`
    Paid { registration_id: i64 },
    /// A payment attempt was declined; the registration stays payable
    AttemptFailed { registration_id: i64 },
    /// Registration no longer pending; nothing changed
    AlreadyProcessed { registration_id: i64 },
    /// No registration owns the order id
    UnknownOrder,
    /// Event type not handled, or no payment entity in it
    Ignored,
}

pub struct RegistrationService {
    pool: SqlitePool,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
    settings: PaymentSettings,
}

impl RegistrationService {
    pub fn new(
        pool: SqlitePool,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Notifier,
        settings: PaymentSettings,
    ) -> Self {
        Self {
            pool,
            gateway,
            notifier,
            settings,
        }
    }

    /// Validate, reject duplicate emails, persist as `pending`
    pub async fn create(&self, payload: &Value) -> RegistrationResult<CreatedRegistration> {
        let new = validation::parse_registration(payload).map_err(RegistrationError::Validation)?;

        if registrations::email_exists(&self.pool, &new.email).await? {
            return Err(RegistrationError::Duplicate);
        }

        let registration = registrations::insert(
            &self.pool,
            &new,
            self.settings.registration_fee,
            now_millis(),
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                RegistrationError::Duplicate
            } else {
                RegistrationError::Store(e)
            }
        })?;

        tracing::info!(
            registration_id = registration.id,
            num_events = registration.num_events,
            "Registration created"
        );

        self.notifier.send_admin_alert(&registration).await;

        Ok(CreatedRegistration {
            registration_id: registration.id,
            registration_fee: registration.registration_fee,
        })
    }

    /// Registration for the payment page; paid registrations are refused
    pub async fn get(&self, registration_id: i64) -> RegistrationResult<RegistrationDetail> {
        let registration = self.find(registration_id).await?;
        if registration.is_paid() {
            return Err(RegistrationError::AlreadyPaid);
        }
        Ok(registration.into())
    }

    /// Create (or reuse) the gateway order for a pending registration
    pub async fn initiate_payment(&self, registration_id: i64) -> RegistrationResult<PaymentOrder> {
        let registration = self.find(registration_id).await?;

        match registration.state() {
            RegistrationState::Paid => return Err(RegistrationError::AlreadyPaid),
            RegistrationState::Failed => return Err(RegistrationError::RegistrationClosed),
            RegistrationState::OrderCreated => {
                if let Some(order_id) = registration.order_id.clone() {
                    tracing::info!(registration_id, order_id = %order_id, "Reusing payment order");
                    return self.payment_order(&registration, order_id);
                }
            }
            RegistrationState::Pending => {}
        }

        let amount = minor_units(registration.registration_fee).ok_or_else(|| {
            RepoError::Corrupt(format!(
                "registration {registration_id} fee out of range: {}",
                registration.registration_fee
            ))
        })?;

        let order = self
            .gateway
            .create_order(
                amount,
                &self.settings.currency,
                &format!("registration-{registration_id}"),
            )
            .await?;

        if registrations::attach_order(&self.pool, registration_id, &order.id).await? {
            tracing::info!(registration_id, order_id = %order.id, amount, "Payment order created");
            return self.payment_order(&registration, order.id);
        }

        // Lost a race: another call attached its order or the payment completed.
        let current = self.find(registration_id).await?;
        tracing::warn!(
            registration_id,
            orphaned_order_id = %order.id,
            "Order not attached, registration changed concurrently"
        );
        match (current.payment_status, current.order_id.clone()) {
            (PaymentStatus::Paid, _) => Err(RegistrationError::AlreadyPaid),
            (PaymentStatus::Failed, _) => Err(RegistrationError::RegistrationClosed),
            (PaymentStatus::Pending, Some(order_id)) => self.payment_order(&current, order_id),
            (PaymentStatus::Pending, None) => Err(RegistrationError::NotFound),
        }
    }

    /// Verify the checkout callback and mark the registration paid
    pub async fn confirm_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> RegistrationResult<ConfirmedPayment> {
        let registration = registrations::find_by_order_id(&self.pool, order_id)
            .await?
            .ok_or(RegistrationError::NotFound)?;

        if !self
            .gateway
            .verify_payment_signature(order_id, payment_id, signature)
        {
            tracing::warn!(
                registration_id = registration.id,
                order_id = %order_id,
                "Payment signature verification failed"
            );
            return Err(RegistrationError::Signature);
        }

        let now = now_millis();
        if let Some(paid) =
            registrations::mark_paid(&self.pool, order_id, payment_id, Some(signature), now).await?
        {
            tracing::info!(
                registration_id = paid.id,
                order_id = %order_id,
                payment_id = %payment_id,
                "Payment verified"
            );
            self.notifier.send_confirmation(&paid).await;
            return Ok(ConfirmedPayment {
                registration_id: paid.id,
                newly_paid: true,
            });
        }

        let current = registrations::find_by_order_id(&self.pool, order_id)
            .await?
            .ok_or(RegistrationError::NotFound)?;
        match current.payment_status {
            PaymentStatus::Paid => {
                tracing::info!(registration_id = current.id, "Payment already confirmed");
                Ok(ConfirmedPayment {
                    registration_id: current.id,
                    newly_paid: false,
                })
            }
            PaymentStatus::Failed => Err(RegistrationError::RegistrationClosed),
            PaymentStatus::Pending => Err(RegistrationError::NotFound),
        }
    }

    /// Process a gateway webhook delivery
    ///
    /// `signature` is the `X-Razorpay-Signature` header over `raw_body`.
    pub async fn handle_webhook(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> RegistrationResult<WebhookOutcome> {
        let Some(signature) = signature.filter(|s| !s.is_empty()) else {
            tracing::warn!("Missing webhook signature header");
            return Err(RegistrationError::Signature);
        };
        if !self.gateway.verify_webhook_signature(raw_body, signature) {
            tracing::warn!("Webhook signature verification failed");
            return Err(RegistrationError::Signature);
        }

        let event: WebhookEvent = serde_json::from_slice(raw_body).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook JSON");
            RegistrationError::Validation(FieldErrors::from([(
                "body".to_string(),
                format!("Malformed webhook payload: {e}"),
            )]))
        })?;

        tracing::info!(event_type = %event.event, "Received payment webhook");

        let Some(payment) = event.payment() else {
            return Ok(WebhookOutcome::Ignored);
        };
        let Some(order_id) = payment.order_id.as_deref() else {
            tracing::debug!(payment_id = %payment.id, "Webhook payment without order id");
            return Ok(WebhookOutcome::Ignored);
        };

        match event.event.as_str() {
            PAYMENT_CAPTURED => {
                let now = now_millis();
                if let Some(paid) =
                    registrations::mark_paid(&self.pool, order_id, &payment.id, None, now).await?
                {
                    tracing::info!(
                        registration_id = paid.id,
                        order_id = %order_id,
                        payment_id = %payment.id,
                        "Payment captured via webhook"
                    );
                    self.notifier.send_confirmation(&paid).await;
                    return Ok(WebhookOutcome::Paid {
                        registration_id: paid.id,
                    });
                }
                self.settled_outcome(order_id).await
            }
            PAYMENT_FAILED => match registrations::find_by_order_id(&self.pool, order_id).await? {
                Some(registration) if registration.payment_status == PaymentStatus::Pending => {
                    tracing::warn!(
                        registration_id = registration.id,
                        order_id = %order_id,
                        payment_id = %payment.id,
                        "Payment attempt declined, order stays open"
                    );
                    Ok(WebhookOutcome::AttemptFailed {
                        registration_id: registration.id,
                    })
                }
                _ => self.settled_outcome(order_id).await,
            },
            other => {
                tracing::debug!(event_type = %other, "Unhandled webhook event type");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }

    /// Outcome when a webhook transition updated no row
    async fn settled_outcome(&self, order_id: &str) -> RegistrationResult<WebhookOutcome> {
        match registrations::find_by_order_id(&self.pool, order_id).await? {
            Some(registration) => {
                tracing::info!(
                    registration_id = registration.id,
                    status = registration.payment_status.as_db(),
                    "Webhook for settled registration, skipping"
                );
                Ok(WebhookOutcome::AlreadyProcessed {
                    registration_id: registration.id,
                })
            }
            None => {
                tracing::warn!(order_id = %order_id, "Webhook for unknown order");
                Ok(WebhookOutcome::UnknownOrder)
            }
        }
    }

    async fn find(&self, registration_id: i64) -> RegistrationResult<Registration> {
        registrations::find_by_id(&self.pool, registration_id)
            .await?
            .ok_or(RegistrationError::NotFound)
    }

    fn payment_order(
        &self,
        registration: &Registration,
        order_id: String,
    ) -> RegistrationResult<PaymentOrder> {
        let amount = minor_units(registration.registration_fee).ok_or_else(|| {
            RepoError::Corrupt(format!("registration {} fee out of range", registration.id))
        })?;
        Ok(PaymentOrder {
            order_id,
            amount,
            currency: self.settings.currency.clone(),
            key: self.gateway.key_id().to_string(),
            name: self.settings.site_name.clone(),
            description: format!("Registration for {}", registration.name),
            prefill: Prefill {
                name: registration.name.clone(),
                email: registration.email.clone(),
                contact: registration.phone.clone(),
            },
        })
    }
}

/// Fee in minor units (paise), rounded to the nearest unit
fn minor_units(fee: Decimal) -> Option<i64> {
    (fee * Decimal::ONE_HUNDRED).round().to_i64()
}
