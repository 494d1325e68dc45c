use serde_json::{Map, Value};
use tracing::{error, info};

use super::types::IpLookup;
use crate::compact::compact_object;
use crate::error::{ApiError, ApiResult, FailureBody};
use crate::providers::{GeolocationProvider, ProviderError};
use crate::validation::{require, validate_ip};

pub async fn lookup_ip<G: GeolocationProvider + ?Sized>(
    provider: &G,
    ip: Option<&str>,
) -> ApiResult<IpLookup> {
    let ip = require(ip, "IP")?.trim();
    let addr = validate_ip(ip)?;

    match provider.fetch_geolocation(addr).await {
        Ok(data) => {
            info!(%ip, "IP geolocation lookup completed");
            Ok(IpLookup {
                success: true,
                ip: ip.to_string(),
                geolocation: curate_geolocation(&data),
            })
        }
        Err(e) => {
            let message = describe_geolocation_error(e);
            error!(%ip, error = %message, "IP geolocation lookup failed");
            Err(ApiError::Upstream(FailureBody::new(message).with_ip(ip)))
        }
    }
}

fn describe_geolocation_error(err: ProviderError) -> String {
    match err {
        ProviderError::Rejected(message) => message,
        ProviderError::NotFound => "IP not found in geolocation database".to_string(),
        ProviderError::Status(code) => format!("IPwho.is API error: {}", code),
        ProviderError::Timeout => "IPwho.is API timeout".to_string(),
        ProviderError::NetworkError(detail) => format!("IPwho.is API request error: {}", detail),
        other => format!("Unexpected error: {}", other),
    }
}

/// Top-level output fields and where they live in the ipwho.is payload.
const FLAT_FIELDS: &[(&str, &str)] = &[
    ("ip", "/ip"),
    ("type", "/type"),
    ("continent", "/continent"),
    ("continent_code", "/continent_code"),
    ("country", "/country"),
    ("country_code", "/country_code"),
    ("region", "/region"),
    ("region_code", "/region_code"),
    ("city", "/city"),
    ("latitude", "/latitude"),
    ("longitude", "/longitude"),
    ("isp", "/connection/isp"),
    ("org", "/connection/org"),
    ("as", "/connection/asn"),
    ("asname", "/connection/asname"),
    ("domain", "/connection/domain"),
    ("mobile", "/connection/mobile"),
    ("proxy", "/connection/proxy"),
    ("hosting", "/connection/hosting"),
    ("vpn", "/connection/vpn"),
    ("tor", "/connection/tor"),
    ("relay", "/connection/relay"),
    ("service", "/connection/service"),
    ("postal", "/postal"),
    ("calling_code", "/calling_code"),
    ("flag", "/flag"),
    ("flag_img", "/flag/img"),
    ("flag_emoji", "/flag/emoji"),
    ("flag_emoji_unicode", "/flag/emoji_unicode"),
];

const NESTED_GROUPS: &[(&str, &[&str])] = &[
    ("timezone", &["id", "abbr", "utc", "current_time"]),
    ("currency", &["name", "code", "symbol", "plural", "exchange_rate"]),
    ("security", &["anonymous", "proxy", "vpn", "tor", "relay", "hosting", "service"]),
];

/// Flattens the ipwho.is payload into the published field set, without nulls.
pub fn curate_geolocation(data: &Value) -> Value {
    let field = |pointer: &str| data.pointer(pointer).cloned().unwrap_or(Value::Null);

    let mut curated = Map::new();
    for (name, pointer) in FLAT_FIELDS {
        curated.insert(name.to_string(), field(pointer));
    }
    for (group, keys) in NESTED_GROUPS {
        let nested: Map<String, Value> = keys
            .iter()
            .map(|key| (key.to_string(), field(&format!("/{}/{}", group, key))))
            .collect();
        curated.insert(group.to_string(), Value::Object(nested));
    }

    compact_object(Value::Object(curated))
}
