use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::types::ProfileRecord;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DomainQuery {
    pub domain: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct IpQuery {
    pub ip: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: "OSINT Backend is running".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UsernameLookup {
    pub success: bool,
    pub username: String,
    pub results: Vec<ProfileRecord>,
    pub total_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EmailLookup {
    pub success: bool,
    pub email: String,
    pub gravatar_url: String,
    pub reputation: Option<serde_json::Value>,
    pub reputation_error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DomainLookup {
    pub success: bool,
    pub domain: String,
    pub ip_address: Option<IpAddr>,
    pub whois_data: Option<serde_json::Value>,
    pub whois_error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct IpLookup {
    pub success: bool,
    /// The address as the caller wrote it, trimmed.
    pub ip: String,
    pub geolocation: serde_json::Value,
}
