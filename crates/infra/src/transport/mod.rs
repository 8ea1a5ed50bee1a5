//! Message transport adapters.

use async_trait::async_trait;

use pharmacie_notifications::{MessageTransport, TransportError};

use crate::config::MailBackend;

pub mod log;
pub mod sendgrid;
pub mod smtp;

pub use log::LogTransport;
pub use sendgrid::SendGridTransport;
pub use smtp::SmtpTransport;

/// Transport backend selected once at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredTransport {
    Log(LogTransport),
    SendGrid(SendGridTransport),
    Smtp(SmtpTransport),
}

impl ConfiguredTransport {
    pub fn from_backend(backend: &MailBackend) -> Result<Self, TransportError> {
        Ok(match backend {
            MailBackend::Log => Self::Log(LogTransport::new()),
            MailBackend::SendGrid {
                api_key,
                from_email,
                from_name,
            } => Self::SendGrid(SendGridTransport::new(api_key, from_email, from_name)?),
            MailBackend::Smtp(settings) => Self::Smtp(SmtpTransport::new(settings)?),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Log(_) => "log",
            Self::SendGrid(_) => "sendgrid",
            Self::Smtp(_) => "smtp",
        }
    }
}

#[async_trait]
impl MessageTransport for ConfiguredTransport {
    async fn send_message(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        match self {
            Self::Log(t) => t.send_message(address, subject, body).await,
            Self::SendGrid(t) => t.send_message(address, subject, body).await,
            Self::Smtp(t) => t.send_message(address, subject, body).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SmtpSecurity, SmtpSettings};

    #[tokio::test]
    async fn backend_selects_transport() {
        let log = ConfiguredTransport::from_backend(&MailBackend::Log).unwrap();
        assert_eq!(log.name(), "log");

        let sendgrid = ConfiguredTransport::from_backend(&MailBackend::SendGrid {
            api_key: "SG.key".to_string(),
            from_email: "a@b.fr".to_string(),
            from_name: "Pharmacie".to_string(),
        })
        .unwrap();
        assert_eq!(sendgrid.name(), "sendgrid");

        let smtp = ConfiguredTransport::from_backend(&MailBackend::Smtp(SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            security: SmtpSecurity::StartTls,
            credentials: Some(("user".to_string(), "pass".to_string())),
            from_email: "a@b.fr".to_string(),
            from_name: "Pharmacie".to_string(),
        }))
        .unwrap();
        assert_eq!(smtp.name(), "smtp");
    }

    #[test]
    fn bad_smtp_sender_fails_at_startup() {
        let err = ConfiguredTransport::from_backend(&MailBackend::Smtp(SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 25,
            security: SmtpSecurity::None,
            credentials: None,
            from_email: "nope".to_string(),
            from_name: "Pharmacie".to_string(),
        }))
        .unwrap_err();
        assert!(matches!(err, TransportError::Configuration(_)));
    }
}
