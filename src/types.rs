// src/types.rs

use serde::{Deserialize, Serialize};

/// One account reported by the profile enumeration tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub site: String,
    pub url: String,
    pub status: ProfileStatus,
}

impl ProfileRecord {
    pub fn found(site: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            url: url.into(),
            status: ProfileStatus::Found,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Found,
}

/// Raw result of one run of the profile enumeration tool.
#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Registration data parsed from a WHOIS response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WhoisRecord {
    pub domain: String,
    pub registrar: Option<String>,
    pub creation_date: Option<String>,
    pub expiration_date: Option<String>,
    pub updated_date: Option<String>,
    pub status: Vec<String>,
    pub name_servers: Vec<String>,
    pub dnssec: Option<String>,
    pub registrant: ContactBlock,
    pub admin: ContactBlock,
    pub tech: ContactBlock,
}

impl WhoisRecord {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// True when at least one registration field was found in the response.
    pub fn is_meaningful(&self) -> bool {
        self.registrar.is_some()
            || self.creation_date.is_some()
            || self.expiration_date.is_some()
            || !self.name_servers.is_empty()
            || !self.status.is_empty()
            || !self.registrant.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactBlock {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ContactBlock {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.organization.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}
