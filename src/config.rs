// src/config.rs

use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Process-wide settings, read once at startup and shared with every handler.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub emailrep_base_url: String,
    pub emailrep_api_key: Option<String>,
    pub ipwho_base_url: String,
    pub http_timeout: Duration,
    pub sherlock: SherlockConfig,
    pub whois: WhoisConfig,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SherlockConfig {
    pub program: String,
    pub args: Vec<String>,
    pub site_timeout_secs: u64,
    pub process_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct WhoisConfig {
    pub bootstrap_server: String,
    pub port: u16,
    pub timeout: Duration,
}

pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "https://*.vercel.app",
    "https://*.railway.app",
];

impl Default for SherlockConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["-m".to_string(), "sherlock_project".to_string()],
            site_timeout_secs: 10,
            process_timeout: Duration::from_secs(300),
        }
    }
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            bootstrap_server: "whois.iana.org".to_string(),
            port: 43,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            emailrep_base_url: "https://emailrep.io".to_string(),
            emailrep_api_key: None,
            ipwho_base_url: "https://ipwho.is".to_string(),
            http_timeout: Duration::from_secs(10),
            sherlock: SherlockConfig::default(),
            whois: WhoisConfig::default(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        config.emailrep_api_key = get("EMAILREP_API_KEY");
        if let Some(url) = get("EMAILREP_BASE_URL") {
            config.emailrep_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = get("IPWHO_BASE_URL") {
            config.ipwho_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = get("HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(parse_number("HTTP_TIMEOUT_SECS", &secs)?);
        }

        if let Some(program) = get("SHERLOCK_PROGRAM") {
            config.sherlock.program = program;
        }
        if let Some(args) = get("SHERLOCK_ARGS") {
            config.sherlock.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(secs) = get("SHERLOCK_SITE_TIMEOUT_SECS") {
            config.sherlock.site_timeout_secs = parse_number("SHERLOCK_SITE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = get("SHERLOCK_TIMEOUT_SECS") {
            config.sherlock.process_timeout =
                Duration::from_secs(parse_number("SHERLOCK_TIMEOUT_SECS", &secs)?);
        }

        if let Some(server) = get("WHOIS_SERVER") {
            config.whois.bootstrap_server = server;
        }
        if let Some(port) = get("WHOIS_PORT") {
            config.whois.port = parse_number("WHOIS_PORT", &port)?;
        }
        if let Some(secs) = get("WHOIS_TIMEOUT_SECS") {
            config.whois.timeout = Duration::from_secs(parse_number("WHOIS_TIMEOUT_SECS", &secs)?);
        }

        if let Some(origins) = get("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
