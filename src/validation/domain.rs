use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

static HOSTNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("hostname pattern is valid")
});

/// Reduces user input such as `https://Example.com:443/path` to `example.com`.
pub fn normalize_domain(raw: &str) -> String {
    let mut domain = raw.trim().to_lowercase();

    if let Some(rest) = domain
        .strip_prefix("http://")
        .or_else(|| domain.strip_prefix("https://"))
    {
        domain = rest.to_string();
    }

    let host = domain.split('/').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    host.to_string()
}

pub fn validate_domain(raw: &str) -> Result<String, ValidationError> {
    let domain = normalize_domain(raw);
    if !HOSTNAME_PATTERN.is_match(&domain) {
        return Err(ValidationError::InvalidDomain);
    }
    Ok(domain)
}
