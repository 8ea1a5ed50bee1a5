//! Log-only transport (dev): every message is accepted and written to the log.

use async_trait::async_trait;
use tracing::{debug, info};

use pharmacie_notifications::{MessageTransport, TransportError};

#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl LogTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageTransport for LogTransport {
    async fn send_message(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        info!(to = address, subject, bytes = body.len(), "[log transport] message accepted");
        debug!(to = address, body, "[log transport] message body");
        Ok(())
    }
}
