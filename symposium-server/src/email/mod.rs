//! Registration notifications
//!
//! [`Notifier`] renders the messages and hands them to a [`Mailer`].
//! Delivery is best-effort: failures are logged and never reach the caller.

pub mod ses;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::Registration;

pub use ses::{LogMailer, SesMailer};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), BoxError>;
}

#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    site_name: String,
    admin_email: Option<String>,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        site_name: impl Into<String>,
        admin_email: Option<String>,
    ) -> Self {
        Self {
            mailer,
            site_name: site_name.into(),
            admin_email,
        }
    }

    /// Confirmation to the attendee; called once per `pending → paid` transition
    pub async fn send_confirmation(&self, registration: &Registration) {
        let message = templates::confirmation(&self.site_name, registration);
        match self.mailer.send(&message).await {
            Ok(()) => tracing::info!(
                registration_id = registration.id,
                to = %message.to,
                "Confirmation email sent"
            ),
            Err(e) => tracing::error!(
                registration_id = registration.id,
                error = %e,
                "Failed to send confirmation email"
            ),
        }
    }

    /// Alert to the organisers about a new registration; skipped without an admin address
    pub async fn send_admin_alert(&self, registration: &Registration) {
        let Some(admin_email) = self.admin_email.as_deref() else {
            tracing::debug!(registration_id = registration.id, "No admin email configured");
            return;
        };
        let message = templates::admin_alert(admin_email, registration);
        if let Err(e) = self.mailer.send(&message).await {
            tracing::warn!(
                registration_id = registration.id,
                error = %e,
                "Failed to send admin alert"
            );
        }
    }
}
