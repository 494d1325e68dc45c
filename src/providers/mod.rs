// src/providers/mod.rs

use async_trait::async_trait;
use std::net::IpAddr;
use thiserror::Error;

use crate::types::*;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("resource not found")]
    NotFound,
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("{0}")]
    NetworkError(String),
    #[error("{0}")]
    InvalidResponse(String),
    /// The upstream answered but reported a failure in its payload.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

/// Runs the external username enumeration tool.
#[async_trait]
pub trait ProfileScanner: Send + Sync {
    async fn scan(&self, username: &str) -> Result<ScanOutput, ProviderError>;
}

/// Email reputation lookups. `NotFound` means the address is unknown upstream.
#[async_trait]
pub trait ReputationProvider: Send + Sync {
    async fn fetch_reputation(&self, email: &str) -> Result<serde_json::Value, ProviderError>;
}

/// IP geolocation lookups returning the upstream payload untouched.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn fetch_geolocation(&self, ip: IpAddr) -> Result<serde_json::Value, ProviderError>;
}

#[async_trait]
pub trait WhoisProvider: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord, ProviderError>;
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, host: &str) -> Result<IpAddr, ProviderError>;
}

// Module declarations
pub mod mocks;
pub mod sherlock;
pub mod emailrep;
pub mod ipwho;
pub mod whois;
pub mod dns;

pub use mocks::{MockDns, MockGeolocation, MockReputation, MockScanner, MockWhois};
pub use sherlock::SherlockScanner;
pub use emailrep::EmailRepProvider;
pub use ipwho::IpWhoProvider;
pub use whois::WhoisClient;
pub use dns::SystemResolver;
