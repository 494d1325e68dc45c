use tracing::{debug, info, warn};

use super::types::DomainLookup;
use crate::compact::compact_object;
use crate::error::{ApiError, ApiResult};
use crate::providers::{DnsResolver, ProviderError, WhoisProvider};
use crate::validation::{require, validate_domain};

/// Resolves the domain and fetches its WHOIS record. Neither failure fails the lookup.
pub async fn lookup_domain<D, W>(
    resolver: &D,
    whois: &W,
    domain: Option<&str>,
) -> ApiResult<DomainLookup>
where
    D: DnsResolver + ?Sized,
    W: WhoisProvider + ?Sized,
{
    let domain = validate_domain(require(domain, "Domain")?)?;

    info!(%domain, "Domain lookup started");

    let ip_address = match resolver.resolve(&domain).await {
        Ok(ip) => Some(ip),
        Err(e) => {
            debug!(%domain, error = %e, "Domain did not resolve");
            None
        }
    };

    let (whois_data, whois_error) = match whois.lookup(&domain).await {
        Ok(record) => {
            let value = serde_json::to_value(&record)
                .map_err(|e| ApiError::Internal(format!("serializing WHOIS record: {}", e)))?;
            (Some(compact_object(value)), None)
        }
        Err(ProviderError::Parse(detail)) => {
            warn!(%domain, %detail, "WHOIS parser error");
            (None, Some(format!("WHOIS parser error: {}", detail)))
        }
        Err(e) => {
            warn!(%domain, error = %e, "Unexpected error in WHOIS lookup");
            (None, Some(format!("Unexpected error: {}", e)))
        }
    };

    Ok(DomainLookup {
        success: true,
        domain,
        ip_address,
        whois_data,
        whois_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockDns, MockWhois};
    use crate::types::WhoisRecord;
    use serde_json::json;

    fn sample_record() -> WhoisRecord {
        let mut record = WhoisRecord::new("example.com");
        record.registrar = Some("Example Registrar".to_string());
        record.name_servers = vec!["a.iana-servers.net".to_string()];
        record.admin.email = Some("hostmaster@example.com".to_string());
        record
    }

    #[tokio::test]
    async fn test_merges_dns_and_compacted_whois() {
        let dns = MockDns::new(Some("93.184.216.34".parse().unwrap()));
        let whois = MockWhois::new().with_record(sample_record());

        let result = lookup_domain(&dns, &whois, Some("https://Example.com:443/x")).await.unwrap();

        assert_eq!(result.domain, "example.com");
        assert_eq!(result.ip_address, Some("93.184.216.34".parse().unwrap()));
        assert_eq!(
            result.whois_data,
            Some(json!({
                "domain": "example.com",
                "registrar": "Example Registrar",
                "name_servers": ["a.iana-servers.net"],
                "admin": {"email": "hostmaster@example.com"},
            }))
        );
        assert!(result.whois_error.is_none());
    }

    #[tokio::test]
    async fn test_parser_error_degrades() {
        let dns = MockDns::new(None);
        let whois = MockWhois::new().with_error(ProviderError::Parse("No match for \"example.zz\"".to_string()));

        let result = lookup_domain(&dns, &whois, Some("example.zz")).await.unwrap();

        assert!(result.success);
        assert!(result.ip_address.is_none());
        assert!(result.whois_data.is_none());
        assert_eq!(
            result.whois_error.as_deref(),
            Some("WHOIS parser error: No match for \"example.zz\"")
        );
    }

    #[tokio::test]
    async fn test_whois_failure_does_not_hide_dns() {
        let dns = MockDns::new(Some("192.0.2.1".parse().unwrap()));
        let whois = MockWhois::new().with_error(ProviderError::Timeout);

        let result = lookup_domain(&dns, &whois, Some("example.com")).await.unwrap();

        assert_eq!(result.ip_address, Some("192.0.2.1".parse().unwrap()));
        assert_eq!(result.whois_error.as_deref(), Some("Unexpected error: request timed out"));
    }

    #[tokio::test]
    async fn test_invalid_domain_makes_no_calls() {
        let dns = MockDns::new(None);
        let whois = MockWhois::new();

        let err = lookup_domain(&dns, &whois, Some("-bad-.com")).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert_eq!(dns.call_count(), 0);
        assert_eq!(whois.call_count(), 0);
    }
}
