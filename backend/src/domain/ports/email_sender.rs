//! Port for outbound e-mail.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by e-mail adapters.
    pub enum EmailError {
        /// The message could not be handed to the transport.
        Delivery { message: String } => "e-mail delivery failed: {message}",
    }
}

/// A single HTML e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}
