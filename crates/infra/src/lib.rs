//! Infrastructure layer: storage adapters, message transports, configuration.

pub mod catalog;
pub mod config;
pub mod transport;

pub use catalog::{ConfiguredCatalog, InMemoryCatalog, PostgresCatalog};
pub use config::{AppConfig, ConfigError, MailBackend, SmtpSecurity, SmtpSettings};
pub use transport::{ConfiguredTransport, LogTransport, SendGridTransport, SmtpTransport};
