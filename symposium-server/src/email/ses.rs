//! Mail transports

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use super::{BoxError, EmailMessage, Mailer};

/// Amazon SES transport
#[derive(Clone)]
pub struct SesMailer {
    ses: SesClient,
    from: String,
}

impl SesMailer {
    pub fn new(ses: SesClient, from: impl Into<String>) -> Self {
        Self {
            ses,
            from: from.into(),
        }
    }

    /// Build a client from the default AWS credential chain, with an optional region override
    pub async fn from_env(from: impl Into<String>, region: Option<String>) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = match region {
            Some(ses_region) => {
                let ses_config = aws_config
                    .to_builder()
                    .region(aws_config::Region::new(ses_region))
                    .build();
                SesClient::new(&ses_config)
            }
            None => SesClient::new(&aws_config),
        };
        Self::new(ses, from)
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), BoxError> {
        let subject = Content::builder()
            .data(&message.subject)
            .charset("UTF-8")
            .build()?;

        let mut body = Body::builder().text(
            Content::builder()
                .data(&message.text)
                .charset("UTF-8")
                .build()?,
        );
        if let Some(html) = &message.html {
            body = body.html(Content::builder().data(html).charset("UTF-8").build()?);
        }

        let email = Message::builder()
            .subject(subject)
            .body(body.build())
            .build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(&message.to).build())
            .content(EmailContent::builder().simple(email).build())
            .send()
            .await?;

        tracing::debug!(to = %message.to, subject = %message.subject, "Email sent via SES");
        Ok(())
    }
}

/// Logs messages instead of sending them (development)
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), BoxError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "Email (log transport)"
        );
        Ok(())
    }
}
