//! SendGrid v3 HTTP API transport.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use pharmacie_notifications::{MessageTransport, TransportError};

pub const DEFAULT_API_BASE: &str = "https://api.sendgrid.com/v3";

/// Upper bound for one API call, connect included. A stalled API fails the
/// send instead of holding up the rest of the run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct SendGridTransport {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl SendGridTransport {
    pub fn new(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
        })
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, TransportError> {
        self.client = http_client(timeout)?;
        Ok(self)
    }

    /// Point the transport at another API root (sandbox, local mock).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn payload(&self, address: &str, subject: &str, body: &str) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": address }] }],
            "from": { "email": &self.from_email, "name": &self.from_name },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
        })
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, TransportError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TransportError::Configuration(format!("cannot build HTTP client: {e}")))
}

#[async_trait]
impl MessageTransport for SendGridTransport {
    async fn send_message(
        &self,
        address: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), TransportError> {
        if self.api_key.trim().is_empty() {
            return Err(TransportError::Configuration("SendGrid API key is empty".to_string()));
        }

        let response = self
            .client
            .post(format!("{}/mail/send", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&self.payload(address, subject, body))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!(to = address, status = status.as_u16(), "[sendgrid] message accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!(to = address, status = status.as_u16(), %body, "[sendgrid] message rejected");
        Err(TransportError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>,
    }

    async fn spawn_mock(status: StatusCode) -> (String, Captured, tokio::task::JoinHandle<()>) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v3/mail/send",
                post(
                    move |State(c): State<Captured>, headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        c.requests.lock().unwrap().push((auth, body));
                        (status, "mock response")
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v3"), captured, handle)
    }

    #[tokio::test]
    async fn accepted_message_posts_expected_payload() {
        let (base, captured, handle) = spawn_mock(StatusCode::ACCEPTED).await;
        let transport = SendGridTransport::new("SG.key", "pharma@example.com", "Pharmacie Centrale")
            .unwrap()
            .with_api_base(base);

        transport
            .send_message("orders@acme.example", "Devis", "Bonjour")
            .await
            .unwrap();

        let requests = captured.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        let (auth, body) = &requests[0];
        assert_eq!(auth.as_deref(), Some("Bearer SG.key"));
        assert_eq!(body["personalizations"][0]["to"][0]["email"], "orders@acme.example");
        assert_eq!(body["from"]["name"], "Pharmacie Centrale");
        assert_eq!(body["subject"], "Devis");
        assert_eq!(body["content"][0]["type"], "text/plain");
        assert_eq!(body["content"][0]["value"], "Bonjour");
        handle.abort();
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let (base, _captured, handle) = spawn_mock(StatusCode::UNAUTHORIZED).await;
        let transport = SendGridTransport::new("SG.bad", "a@b.fr", "x")
            .unwrap()
            .with_api_base(base);

        let err = transport.send_message("to@b.fr", "s", "b").await.unwrap_err();
        assert_eq!(
            err,
            TransportError::Rejected {
                status: 401,
                body: "mock response".to_string(),
            }
        );
        handle.abort();
    }

    #[tokio::test]
    async fn unreachable_api_is_network_error() {
        let transport = SendGridTransport::new("SG.key", "a@b.fr", "x")
            .unwrap()
            .with_api_base("http://127.0.0.1:1");
        let err = transport.send_message("to@b.fr", "s", "b").await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[tokio::test]
    async fn stalled_api_times_out_as_network_error() {
        let app = Router::new().route(
            "/v3/mail/send",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::ACCEPTED
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let transport = SendGridTransport::new("SG.key", "a@b.fr", "x")
            .unwrap()
            .with_timeout(Duration::from_millis(200))
            .unwrap()
            .with_api_base(format!("http://{addr}/v3"));

        let started = std::time::Instant::now();
        let err = transport.send_message("to@b.fr", "s", "b").await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
        handle.abort();
    }

    #[tokio::test]
    async fn empty_key_is_configuration_error() {
        let transport = SendGridTransport::new(" ", "a@b.fr", "x").unwrap();
        let err = transport.send_message("to@b.fr", "s", "b").await.unwrap_err();
        assert!(matches!(err, TransportError::Configuration(_)));
    }
}
