//! Outbound message transport abstraction (delivery mechanics only).
//!
//! A transport knows how to hand a plain-text message to some delivery backend
//! (SMTP relay, HTTP mail API, a log sink in dev). It does not retry; callers
//! decide what a failure means.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Failure to hand a message to the delivery backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The backend answered but refused the message.
    #[error("message rejected (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The backend could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The transport is misconfigured (missing key, bad sender, ...).
    #[error("transport misconfigured: {0}")]
    Configuration(String),
}

/// Capability to send one plain-text message.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_message(&self, address: &str, subject: &str, body: &str)
        -> Result<(), TransportError>;
}

#[async_trait]
impl<T> MessageTransport for Arc<T>
where
    T: MessageTransport + ?Sized,
{
    async fn send_message(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        (**self).send_message(address, subject, body).await
    }
}
