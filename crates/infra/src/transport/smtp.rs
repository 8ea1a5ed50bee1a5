//! SMTP relay transport.
//!
//! ## Error Mapping
//!
//! | Failure                                     | TransportError  |
//! |---------------------------------------------|-----------------|
//! | relay answered with a 4xx/5xx reply         | `Rejected`      |
//! | connection, TLS, timeout                    | `Network`       |
//! | recipient address not accepted by `lettre`  | `Rejected` (0)  |
//! | bad sender address, TLS setup               | `Configuration` |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use pharmacie_notifications::{MessageTransport, TransportError};

use crate::config::{SmtpSecurity, SmtpSettings};

/// Upper bound for each SMTP command round-trip, connect included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct SmtpTransport {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    relay: String,
}

impl SmtpTransport {
    pub fn new(settings: &SmtpSettings) -> Result<Self, TransportError> {
        let builder = match settings.security {
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| configuration("STARTTLS setup", e))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| configuration("TLS setup", e))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            }
        };

        let mut builder = builder
            .port(settings.port)
            .timeout(Some(DEFAULT_TIMEOUT));
        if let Some((username, password)) = &settings.credentials {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let address = settings
            .from_email
            .parse::<Address>()
            .map_err(|e| configuration("sender address", e))?;

        Ok(Self {
            mailer: Arc::new(builder.build()),
            from: Mailbox::new(Some(settings.from_name.clone()), address),
            relay: format!("{}:{}", settings.host, settings.port),
        })
    }

    fn message(&self, address: &str, subject: &str, body: &str) -> Result<Message, TransportError> {
        let to = address.parse::<Address>().map_err(|e| TransportError::Rejected {
            status: 0,
            body: format!("invalid recipient {address}: {e}"),
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to))
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| configuration("message build", e))
    }
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("relay", &self.relay)
            .field("from", &self.from.to_string())
            .finish()
    }
}

fn configuration(what: &str, err: impl std::fmt::Display) -> TransportError {
    TransportError::Configuration(format!("{what}: {err}"))
}

fn map_smtp_error(err: lettre::transport::smtp::Error) -> TransportError {
    let status = err
        .status()
        .and_then(|code| code.to_string().parse::<u16>().ok());
    match status {
        Some(status) => TransportError::Rejected {
            status,
            body: err.to_string(),
        },
        None => TransportError::Network(err.to_string()),
    }
}

#[async_trait]
impl MessageTransport for SmtpTransport {
    async fn send_message(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        let message = self.message(address, subject, body)?;

        match self.mailer.send(message).await {
            Ok(response) => {
                info!(
                    to = address,
                    relay = %self.relay,
                    code = %response.code(),
                    "[smtp] message accepted"
                );
                Ok(())
            }
            Err(e) => {
                let err = map_smtp_error(e);
                error!(to = address, relay = %self.relay, error = %err, "[smtp] message not sent");
                Err(err)
            }
        }
    }
}
