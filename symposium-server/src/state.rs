//! Application state

use std::sync::Arc;

use crate::config::{Config, MailTransport};
use crate::db::DbService;
use crate::email::{LogMailer, Mailer, Notifier, SesMailer};
use crate::payment::{PaymentGateway, RazorpayGateway};
use crate::registration::{PaymentSettings, RegistrationService};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DbService,
    pub registrations: Arc<RegistrationService>,
    /// Prefix for relative media paths in content responses
    pub media_base_url: String,
}

impl AppState {
    /// Create a new AppState: open the store, build the gateway and mail transport
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_url).await?;

        let gateway = RazorpayGateway::from_config(config)?;

        let mailer: Arc<dyn Mailer> = match config.mail_transport {
            MailTransport::Ses => {
                tracing::info!(from = %config.mail_from, "Mail transport: SES");
                Arc::new(SesMailer::from_env(&config.mail_from, config.ses_region.clone()).await)
            }
            MailTransport::Log => {
                tracing::info!("Mail transport: log only");
                Arc::new(LogMailer)
            }
        };

        Ok(Self::from_parts(db, Arc::new(gateway), mailer, config))
    }

    /// Assemble state from already-built components
    pub fn from_parts(
        db: DbService,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Self {
        let notifier = Notifier::new(mailer, &config.site_name, config.admin_email.clone());
        let registrations = RegistrationService::new(
            db.pool.clone(),
            gateway,
            notifier,
            PaymentSettings {
                registration_fee: config.registration_fee,
                currency: config.payment_currency.clone(),
                site_name: config.site_name.clone(),
            },
        );

        Self {
            db,
            registrations: Arc::new(registrations),
            media_base_url: config.media_base_url.clone(),
        }
    }
}
