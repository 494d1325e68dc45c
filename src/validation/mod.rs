// src/validation/mod.rs

use thiserror::Error;

pub mod username;
pub mod email;
pub mod domain;
pub mod ip;

pub use username::validate_username;
pub use email::validate_email;
pub use domain::{normalize_domain, validate_domain};
pub use ip::validate_ip;

/// Rejected lookup input. The message is returned to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} parameter is required")]
    Missing(&'static str),
    #[error("Username is required")]
    EmptyUsername,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid domain format")]
    InvalidDomain,
    #[error("Invalid IP address format")]
    InvalidIp,
}

/// Treats an absent or empty query parameter as missing.
pub fn require<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Missing(name)),
    }
}
