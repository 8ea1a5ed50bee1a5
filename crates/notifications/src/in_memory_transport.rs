//! In-memory transport for tests/dev.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::transport::{MessageTransport, TransportError};

/// A message accepted by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub address: String,
    pub subject: String,
    pub body: String,
}

/// Transport that keeps accepted messages in memory.
///
/// Individual addresses can be configured to fail with a given error, which
/// lets tests exercise partial outages.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<SentMessage>>,
    failures: HashMap<String, TransportError>,
    attempts: Mutex<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `address` fail with `error`.
    pub fn failing_for(mut self, address: impl Into<String>, error: TransportError) -> Self {
        self.failures.insert(address.into(), error);
        self
    }

    /// Messages accepted so far, in send order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of send attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|a| *a).unwrap_or_default()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send_message(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts += 1;
        }

        if let Some(err) = self.failures.get(address) {
            return Err(err.clone());
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| TransportError::Configuration("recording transport poisoned".to_string()))?;
        sent.push(SentMessage {
            address: address.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
