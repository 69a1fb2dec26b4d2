//! Registration-and-payment pipeline

pub mod error;
pub mod service;

pub use error::{RegistrationError, RegistrationResult};
pub use service::{
    ConfirmedPayment, CreatedRegistration, PaymentOrder, PaymentSettings, Prefill,
    RegistrationService, WebhookOutcome,
};
