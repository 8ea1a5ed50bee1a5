//! Failure-isolating notification dispatch.

use tracing::{error, info};

use pharmacie_suppliers::Supplier;

use crate::compose::SUBJECT;
use crate::transport::MessageTransport;

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub success: bool,
    /// Transport error text when the attempt failed.
    pub error: Option<String>,
}

impl DispatchResult {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Sends composed notifications through a transport chosen at startup.
///
/// A transport failure is logged and turned into `success = false`; it never
/// propagates, so one unreachable supplier cannot stop the others.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher<T> {
    transport: T,
}

impl<T> NotificationDispatcher<T>
where
    T: MessageTransport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Attempt delivery exactly once.
    pub async fn dispatch(&self, supplier: &Supplier, body: &str) -> DispatchResult {
        match self
            .transport
            .send_message(supplier.email(), SUBJECT, body)
            .await
        {
            Ok(()) => {
                info!(supplier = supplier.name(), email = supplier.email(), "notification sent");
                DispatchResult::delivered()
            }
            Err(e) => {
                error!(
                    supplier = supplier.name(),
                    email = supplier.email(),
                    error = %e,
                    "notification failed"
                );
                DispatchResult::failed(e.to_string())
            }
        }
    }
}
