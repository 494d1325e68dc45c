use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::*;

/// Canned scanner output. Counts calls so tests can assert nothing ran.
pub struct MockScanner {
    pub result: Mutex<Option<Result<ScanOutput, ProviderError>>>,
    pub calls: AtomicUsize,
}

impl MockScanner {
    pub fn new() -> Self {
        Self {
            result: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_stdout(self, stdout: &str) -> Self {
        self.with_output(ScanOutput {
            success: true,
            stdout: stdout.as_bytes().to_vec(),
            stderr: String::new(),
        })
    }

    pub fn with_output(self, output: ScanOutput) -> Self {
        *self.result.lock().unwrap() = Some(Ok(output));
        self
    }

    pub fn with_error(self, error: ProviderError) -> Self {
        *self.result.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileScanner for MockScanner {
    async fn scan(&self, _username: &str) -> Result<ScanOutput, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(ProviderError::NotFound))
    }
}

pub struct MockReputation {
    pub response: Mutex<Option<Result<serde_json::Value, ProviderError>>>,
    pub calls: AtomicUsize,
}

impl MockReputation {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_data(self, data: serde_json::Value) -> Self {
        *self.response.lock().unwrap() = Some(Ok(data));
        self
    }

    pub fn with_error(self, error: ProviderError) -> Self {
        *self.response.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockReputation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReputationProvider for MockReputation {
    async fn fetch_reputation(&self, _email: &str) -> Result<serde_json::Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(ProviderError::NotFound))
    }
}

pub struct MockGeolocation {
    pub response: Mutex<Option<Result<serde_json::Value, ProviderError>>>,
    pub calls: AtomicUsize,
}

impl MockGeolocation {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_data(self, data: serde_json::Value) -> Self {
        *self.response.lock().unwrap() = Some(Ok(data));
        self
    }

    pub fn with_error(self, error: ProviderError) -> Self {
        *self.response.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeolocationProvider for MockGeolocation {
    async fn fetch_geolocation(&self, _ip: IpAddr) -> Result<serde_json::Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(ProviderError::NotFound))
    }
}

pub struct MockWhois {
    pub response: Mutex<Option<Result<WhoisRecord, ProviderError>>>,
    pub calls: AtomicUsize,
}

impl MockWhois {
    pub fn new() -> Self {
        Self {
            response: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_record(self, record: WhoisRecord) -> Self {
        *self.response.lock().unwrap() = Some(Ok(record));
        self
    }

    pub fn with_error(self, error: ProviderError) -> Self {
        *self.response.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockWhois {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WhoisProvider for MockWhois {
    async fn lookup(&self, _domain: &str) -> Result<WhoisRecord, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(ProviderError::NotFound))
    }
}

pub struct MockDns {
    pub address: Option<IpAddr>,
    pub calls: AtomicUsize,
}

impl MockDns {
    pub fn new(address: Option<IpAddr>) -> Self {
        Self {
            address,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for MockDns {
    async fn resolve(&self, _host: &str) -> Result<IpAddr, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.address.ok_or(ProviderError::NotFound)
    }
}
