use async_trait::async_trait;
use reqwest::StatusCode;
use std::net::IpAddr;
use std::time::Duration;
use tracing::info;

use super::emailrep::USER_AGENT;
use super::{GeolocationProvider, ProviderError};

/// Client for the ipwho.is geolocation API.
pub struct IpWhoProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl IpWhoProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl GeolocationProvider for IpWhoProvider {
    async fn fetch_geolocation(&self, ip: IpAddr) -> Result<serde_json::Value, ProviderError> {
        info!(%ip, "Starting IP geolocation lookup");

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, ip))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let data = response.json::<serde_json::Value>().await?;

                // ipwho.is reports lookup failures with a 200 and success=false
                if data.get("success").and_then(|v| v.as_bool()) == Some(false) {
                    let message = data
                        .get("message")
                        .and_then(|m| m.as_str())
                        .unwrap_or("IPwho.is API error")
                        .to_string();
                    return Err(ProviderError::Rejected(message));
                }

                Ok(data)
            }
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound),
            status => Err(ProviderError::Status(status.as_u16())),
        }
    }
}
