use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};

use super::{ProviderError, ReputationProvider};

pub const USER_AGENT: &str = "OSINT-Dashboard/1.0";

/// Client for the emailrep.io reputation API.
pub struct EmailRepProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl EmailRepProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl ReputationProvider for EmailRepProvider {
    async fn fetch_reputation(&self, email: &str) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}/{}", self.base_url, email);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => {
                let data = response.json::<serde_json::Value>().await?;
                info!(email, "Email reputation retrieved");
                Ok(data)
            }
            StatusCode::NOT_FOUND => {
                warn!(email, "Email not found in reputation database");
                Err(ProviderError::NotFound)
            }
            status => Err(ProviderError::Status(status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_reputation_passthrough_with_bearer() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/bob@example.com")
                .header("authorization", "Bearer key123")
                .header("user-agent", USER_AGENT);
            then.status(200)
                .json_body(json!({"email": "bob@example.com", "reputation": "high", "suspicious": false}));
        });

        let provider = EmailRepProvider::new(
            server.base_url(),
            Some("key123".to_string()),
            Duration::from_secs(5),
        );
        let data = provider.fetch_reputation("bob@example.com").await.unwrap();

        mock.assert();
        assert_eq!(data["reputation"], "high");
    }

    #[tokio::test]
    async fn test_without_key_still_queries() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/a@b.io");
            then.status(200).json_body(json!({"reputation": "low"}));
        });

        let provider = EmailRepProvider::new(server.base_url(), None, Duration::from_secs(5));
        let data = provider.fetch_reputation("a@b.io").await.unwrap();

        mock.assert();
        assert_eq!(data["reputation"], "low");
    }

    #[tokio::test]
    async fn test_not_found_and_status_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing@example.com");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(GET).path("/limited@example.com");
            then.status(429);
        });

        let provider = EmailRepProvider::new(server.base_url(), None, Duration::from_secs(5));

        assert!(matches!(
            provider.fetch_reputation("missing@example.com").await,
            Err(ProviderError::NotFound)
        ));
        assert!(matches!(
            provider.fetch_reputation("limited@example.com").await,
            Err(ProviderError::Status(429))
        ));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow@example.com");
            then.status(200).delay(Duration::from_millis(1500)).json_body(json!({}));
        });

        let provider = EmailRepProvider::new(server.base_url(), None, Duration::from_millis(200));

        assert!(matches!(
            provider.fetch_reputation("slow@example.com").await,
            Err(ProviderError::Timeout)
        ));
    }
}
