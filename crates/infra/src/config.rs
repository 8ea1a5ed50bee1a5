//! Process configuration, read once at startup from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_FROM_EMAIL: &str = "pharmacie-centrale@example.com";
pub const DEFAULT_FROM_NAME: &str = "Pharmacie Centrale";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Which delivery backend sends supplier notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBackend {
    /// Write messages to the log only (dev).
    Log,
    /// SendGrid v3 HTTP API.
    SendGrid {
        api_key: String,
        from_email: String,
        from_name: String,
    },
    /// SMTP relay.
    Smtp(SmtpSettings),
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587).
    StartTls,
    /// TLS from the first byte (port 465).
    Tls,
    /// Unencrypted, for a local relay or test server (port 25).
    None,
}

impl SmtpSecurity {
    pub fn default_port(self) -> u16 {
        match self {
            SmtpSecurity::StartTls => 587,
            SmtpSecurity::Tls => 465,
            SmtpSecurity::None => 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    /// Username and password, when the relay requires authentication.
    pub credentials: Option<(String, String)>,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory catalog.
    pub database_url: Option<String>,
    /// JSON file used to seed the in-memory catalog.
    pub catalog_seed_path: Option<PathBuf>,
    pub mail: MailBackend,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let mail = match get("MAIL_BACKEND")
            .map(|v| v.to_lowercase())
            .as_deref()
            .unwrap_or("log")
        {
            "log" => MailBackend::Log,
            "sendgrid" => MailBackend::SendGrid {
                api_key: get("SENDGRID_API_KEY").ok_or(ConfigError::Missing("SENDGRID_API_KEY"))?,
                from_email: get("SENDGRID_FROM_EMAIL")
                    .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
                from_name: get("SENDGRID_FROM_NAME")
                    .unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            },
            "smtp" => MailBackend::Smtp(smtp_settings(&get)?),
            other => {
                return Err(ConfigError::Invalid {
                    key: "MAIL_BACKEND",
                    reason: format!("expected `log`, `sendgrid` or `smtp`, got `{other}`"),
                });
            }
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            catalog_seed_path: get("CATALOG_SEED_PATH").map(PathBuf::from),
            mail,
        })
    }
}

fn smtp_settings<G>(get: &G) -> Result<SmtpSettings, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let host = get("SMTP_HOST").ok_or(ConfigError::Missing("SMTP_HOST"))?;

    let security = match get("SMTP_SECURITY")
        .map(|v| v.to_lowercase())
        .as_deref()
        .unwrap_or("starttls")
    {
        "starttls" => SmtpSecurity::StartTls,
        "tls" => SmtpSecurity::Tls,
        "none" => SmtpSecurity::None,
        other => {
            return Err(ConfigError::Invalid {
                key: "SMTP_SECURITY",
                reason: format!("expected `starttls`, `tls` or `none`, got `{other}`"),
            });
        }
    };

    let port = match get("SMTP_PORT") {
        Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
            key: "SMTP_PORT",
            reason: e.to_string(),
        })?,
        None => security.default_port(),
    };

    let credentials = match (get("SMTP_USERNAME"), get("SMTP_PASSWORD")) {
        (Some(user), Some(password)) => Some((user, password)),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::Missing("SMTP_PASSWORD")),
        (None, Some(_)) => return Err(ConfigError::Missing("SMTP_USERNAME")),
    };

    Ok(SmtpSettings {
        host,
        port,
        security,
        credentials,
        from_email: get("SMTP_FROM_EMAIL").unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
        from_name: get("SMTP_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
    })
}
