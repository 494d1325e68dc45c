use std::net::IpAddr;

use super::ValidationError;

/// Accepts IPv4 and IPv6 literals only; hostnames are not resolved.
pub fn validate_ip(raw: &str) -> Result<IpAddr, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::InvalidIp)
}
