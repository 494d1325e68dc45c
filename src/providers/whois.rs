//! WHOIS lookups over plain TCP (RFC 3912).
//!
//! A query starts at the bootstrap server (IANA by default), follows its
//! `refer:` line to the TLD registry, and then follows at most one
//! `Registrar WHOIS Server:` referral for thin registries such as `.com`.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::{ProviderError, WhoisProvider};
use crate::config::WhoisConfig;
use crate::types::*;

const NO_MATCH_PHRASES: &[&str] = &[
    "no match for",
    "not found",
    "no data found",
    "no entries found",
    "status: free",
    "returned 0 objects",
];

const REDACTED_MARKERS: &[&str] = &["redacted for privacy", "data redacted", "not disclosed"];

pub struct WhoisClient {
    bootstrap_server: String,
    port: u16,
    timeout: Duration,
}

impl WhoisClient {
    pub fn new(config: &WhoisConfig) -> Self {
        Self {
            bootstrap_server: config.bootstrap_server.clone(),
            port: config.port,
            timeout: config.timeout,
        }
    }

    async fn query(&self, server: &str, domain: &str) -> Result<String, ProviderError> {
        debug!(server, domain, "Sending WHOIS query");

        let exchange = async {
            let mut stream = TcpStream::connect((server, self.port)).await?;
            stream.write_all(format!("{}\r\n", domain).as_bytes()).await?;

            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };

        let buf = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ProviderError::Timeout)??;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Returns the raw WHOIS text closest to the registrar for `domain`.
    pub async fn fetch_raw(&self, domain: &str) -> Result<String, ProviderError> {
        let bootstrap = self.query(&self.bootstrap_server, domain).await?;

        // The bootstrap reply describes the TLD, never the domain itself
        let registry = match find_referral(&bootstrap, &["refer", "whois"]) {
            Some(server) if !server.eq_ignore_ascii_case(&self.bootstrap_server) => server,
            _ if is_no_match(&bootstrap) => return Err(no_match(domain)),
            _ => {
                return Err(ProviderError::Parse(format!(
                    "No WHOIS server known for \"{}\"",
                    domain
                )))
            }
        };
        let registry_text = self.query(&registry, domain).await?;

        let registrar = match find_referral(&registry_text, &["registrar whois server"]) {
            Some(server) if !server.eq_ignore_ascii_case(&registry) => server,
            _ => return Ok(registry_text),
        };

        match self.query(&registrar, domain).await {
            Ok(text) if parse_whois_response(domain, &text).is_meaningful() => Ok(text),
            Ok(_) => Ok(registry_text),
            Err(e) => {
                warn!(server = %registrar, error = %e, "Registrar WHOIS query failed, using registry data");
                Ok(registry_text)
            }
        }
    }
}

#[async_trait]
impl WhoisProvider for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord, ProviderError> {
        info!(domain, "Starting WHOIS lookup");

        let raw = self.fetch_raw(domain).await?;
        let record = parse_whois_response(domain, &raw);

        if !record.is_meaningful() {
            if is_no_match(&raw) {
                return Err(no_match(domain));
            }
            return Err(ProviderError::Parse(format!(
                "No WHOIS data for \"{}\"",
                domain
            )));
        }

        info!(domain, "WHOIS lookup completed");
        Ok(record)
    }
}

/// Finds the first `key: server` line among `keys`, stripping any URL scheme.
fn find_referral(raw: &str, keys: &[&str]) -> Option<String> {
    raw.lines().find_map(|line| {
        let (key, value) = line.trim().split_once(':')?;
        if !keys.contains(&key.trim().to_lowercase().as_str()) {
            return None;
        }
        let value = value.trim();
        let host = value
            .strip_prefix("whois://")
            .or_else(|| value.strip_prefix("rwhois://"))
            .unwrap_or(value)
            .trim_end_matches('/');
        (!host.is_empty()).then(|| host.to_string())
    })
}

fn no_match(domain: &str) -> ProviderError {
    ProviderError::Parse(format!("No match for \"{}\"", domain))
}

fn is_no_match(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    NO_MATCH_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

fn is_redacted(value: &str) -> bool {
    let lower = value.to_lowercase();
    REDACTED_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Parses `key: value` WHOIS text into a record. Unknown keys are ignored.
pub fn parse_whois_response(domain: &str, raw: &str) -> WhoisRecord {
    let mut record = WhoisRecord::new(domain);

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() || is_redacted(value) {
            continue;
        }

        match key.as_str() {
            "registrar" | "sponsoring registrar" | "registrar name" => {
                set_once(&mut record.registrar, value);
            }
            "creation date" | "created" | "created on" | "registered on" | "registration time" => {
                set_once(&mut record.creation_date, value);
            }
            "registry expiry date"
            | "registrar registration expiration date"
            | "expiration date"
            | "expiry date"
            | "expires"
            | "expires on"
            | "paid-till" => {
                set_once(&mut record.expiration_date, value);
            }
            "updated date" | "last updated" | "last-update" | "last modified" | "changed" => {
                set_once(&mut record.updated_date, value);
            }
            "domain status" | "status" | "state" => {
                // "clientTransferProhibited https://icann.org/epp#..." keeps only the code
                let code = value.split_whitespace().next().unwrap_or(value).to_string();
                if !record.status.contains(&code) {
                    record.status.push(code);
                }
            }
            "name server" | "nameserver" | "nserver" | "name servers" => {
                let server = value.split_whitespace().next().unwrap_or(value).to_lowercase();
                let server = server.trim_end_matches('.').to_string();
                if !record.name_servers.contains(&server) {
                    record.name_servers.push(server);
                }
            }
            "dnssec" => set_once(&mut record.dnssec, value),
            _ => parse_contact_field(&mut record, &key, value),
        }
    }

    record
}

fn parse_contact_field(record: &mut WhoisRecord, key: &str, value: &str) {
    let (block, field) = if let Some(field) = key.strip_prefix("registrant") {
        (&mut record.registrant, field)
    } else if let Some(field) = key.strip_prefix("admin") {
        (&mut record.admin, field)
    } else if let Some(field) = key.strip_prefix("tech") {
        (&mut record.tech, field)
    } else {
        return;
    };

    match field.trim() {
        "" | "name" => set_once(&mut block.name, value),
        "organization" | "organisation" | "org" => set_once(&mut block.organization, value),
        "email" => set_once(&mut block.email, value),
        "phone" => set_once(&mut block.phone, value),
        "street" | "address" | "city" | "state/province" | "postal code" | "country" => {
            match &mut block.address {
                Some(address) => {
                    address.push_str(", ");
                    address.push_str(value);
                }
                None => block.address = Some(value.to_string()),
            }
        }
        _ => {}
    }
}

fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}
