//! E-mail adapter that records outgoing mail in the trace log.
//!
//! No SMTP transport is wired in; messages are logged at `info` with the
//! configured SMTP host so operators can see where mail would have gone.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::EmailSettings;
use crate::domain::ports::{EmailError, EmailMessage, EmailSender, WritableOptions};

/// [`EmailSender`] that logs each message instead of delivering it.
#[derive(Clone)]
pub struct TracingEmailSender {
    settings: Arc<dyn WritableOptions<EmailSettings>>,
}

impl TracingEmailSender {
    pub fn new(settings: Arc<dyn WritableOptions<EmailSettings>>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl EmailSender for TracingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if message.to.trim().is_empty() {
            return Err(EmailError::delivery("recipient address is empty"));
        }
        let settings = self
            .settings
            .value()
            .map_err(|err| EmailError::delivery(err.to_string()))?;
        info!(
            to = %message.to,
            subject = %message.subject,
            smtp_host = %settings.smtp_host,
            smtp_port = settings.smtp_port,
            body_len = message.html_body.len(),
            "outgoing e-mail"
        );
        Ok(())
    }
}
