//! Server configuration

use rust_decimal::Decimal;
use std::str::FromStr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How outgoing mail is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransport {
    /// Amazon SES
    Ses,
    /// Write the rendered message to the log instead of sending it
    Log,
}

impl MailTransport {
    fn parse(value: &str) -> Result<Self, BoxError> {
        match value.to_ascii_lowercase().as_str() {
            "ses" => Ok(Self::Ses),
            "log" => Ok(Self::Log),
            other => Err(format!("MAIL_TRANSPORT must be 'ses' or 'log', got '{other}'").into()),
        }
    }
}

/// Symposium server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Razorpay public key id (handed to the checkout widget)
    pub razorpay_key_id: String,
    /// Razorpay API secret (order creation + payment signatures)
    pub razorpay_key_secret: String,
    /// Razorpay webhook signing secret
    pub razorpay_webhook_secret: String,
    /// Razorpay REST base URL
    pub razorpay_api_base: String,
    /// Timeout for outbound gateway calls, in seconds
    pub gateway_timeout_secs: u64,
    /// ISO currency code for payment orders
    pub payment_currency: String,
    /// Fee charged per registration
    pub registration_fee: Decimal,
    /// Display name used in emails and the checkout widget
    pub site_name: String,
    pub mail_transport: MailTransport,
    /// Sender address for outgoing mail
    pub mail_from: String,
    /// Recipient of new-registration alerts (alerts disabled when unset)
    pub admin_email: Option<String>,
    /// SES region override
    pub ses_region: Option<String>,
    /// Allowed CORS origins (ignored in development)
    pub cors_allowed_origins: Vec<String>,
    /// Prefix for relative media paths
    pub media_base_url: String,
    pub log_level: String,
    pub log_json: bool,
    /// Daily-rotated log files are written here when set
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 8000,
            database_url: "sqlite:symposium.db".into(),
            razorpay_key_id: "rzp_test_dev".into(),
            razorpay_key_secret: "dev-RAZORPAY_KEY_SECRET-not-for-production".into(),
            razorpay_webhook_secret: "dev-RAZORPAY_KEY_SECRET-not-for-production".into(),
            razorpay_api_base: "https://api.razorpay.com".into(),
            gateway_timeout_secs: 30,
            payment_currency: "INR".into(),
            registration_fee: Decimal::new(50000, 2),
            site_name: "Zehinix Symposium".into(),
            mail_transport: MailTransport::Log,
            mail_from: "noreply@zehinix.com".into(),
            admin_email: None,
            ses_region: None,
            cors_allowed_origins: Vec::new(),
            media_base_url: "http://localhost:8000/media/".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_dev = environment == "development";

        let razorpay_key_secret = Self::require_secret("RAZORPAY_KEY_SECRET", &environment)?;
        let razorpay_webhook_secret = Self::optional("RAZORPAY_WEBHOOK_SECRET")
            .unwrap_or_else(|| razorpay_key_secret.clone());

        let mut registration_fee = match Self::optional("REGISTRATION_FEE") {
            Some(raw) => Decimal::from_str(raw.trim())
                .map_err(|e| format!("REGISTRATION_FEE is not a decimal: {e}"))?,
            None => defaults.registration_fee,
        };
        if registration_fee.is_sign_negative() {
            return Err("REGISTRATION_FEE must not be negative".into());
        }
        // always two decimal places, e.g. "500" → "500.00"
        registration_fee.rescale(2);

        let mail_transport = match Self::optional("MAIL_TRANSPORT") {
            Some(raw) => MailTransport::parse(&raw)?,
            None if is_dev => MailTransport::Log,
            None => MailTransport::Ses,
        };

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.http_port),
            database_url: Self::optional("DATABASE_URL").unwrap_or(defaults.database_url),
            razorpay_key_id: Self::require_secret("RAZORPAY_KEY_ID", &environment)?,
            razorpay_key_secret,
            razorpay_webhook_secret,
            razorpay_api_base: Self::optional("RAZORPAY_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.razorpay_api_base),
            gateway_timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.gateway_timeout_secs),
            payment_currency: Self::optional("PAYMENT_CURRENCY").unwrap_or(defaults.payment_currency),
            registration_fee,
            site_name: Self::optional("SITE_NAME").unwrap_or(defaults.site_name),
            mail_transport,
            mail_from: Self::optional("MAIL_FROM").unwrap_or(defaults.mail_from),
            admin_email: Self::optional("ADMIN_EMAIL"),
            ses_region: Self::optional("SES_REGION"),
            cors_allowed_origins: Self::optional("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            media_base_url: Self::optional("MEDIA_BASE_URL").unwrap_or(defaults.media_base_url),
            log_level: Self::optional("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: std::env::var("LOG_JSON")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(!is_dev),
            log_dir: Self::optional("LOG_DIR"),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
