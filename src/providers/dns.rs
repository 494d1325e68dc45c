use async_trait::async_trait;
use std::net::IpAddr;
use tracing::debug;

use super::{DnsResolver, ProviderError};

/// Forward resolution through the system resolver.
pub struct SystemResolver;

#[async_trait]
impl DnsResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, ProviderError> {
        let addrs: Vec<IpAddr> = tokio::net::lookup_host((host, 0))
            .await?
            .map(|addr| addr.ip())
            .collect();

        debug!(host, count = addrs.len(), "Resolved host");

        pick_address(&addrs).ok_or(ProviderError::NotFound)
    }
}

/// Prefers the first IPv4 address, falling back to the first of any family.
fn pick_address(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_prefers_ipv4() {
        let addrs: Vec<IpAddr> = vec!["2001:db8::1".parse().unwrap(), "192.0.2.7".parse().unwrap()];
        assert_eq!(pick_address(&addrs), Some("192.0.2.7".parse().unwrap()));
    }

    #[test]
    fn test_pick_falls_back_to_ipv6() {
        let addrs: Vec<IpAddr> = vec!["2001:db8::1".parse().unwrap()];
        assert_eq!(pick_address(&addrs), Some("2001:db8::1".parse().unwrap()));
        assert_eq!(pick_address(&[]), None);
    }

    #[tokio::test]
    async fn test_resolve_localhost() {
        let ip = SystemResolver.resolve("localhost").await.unwrap();
        assert!(ip.is_loopback());
    }
}
