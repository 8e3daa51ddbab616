// Single-request HTTP checks against a running container

use crate::errors::{NctError, Result};
use reqwest::blocking::Client;
use reqwest::header::HOST;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// One GET request and what its response should look like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub address: String,
    pub port: Option<u16>,
    pub path: String,
    pub host: Option<String>,
    pub expected_code: Option<u16>,
    pub expected_output: Option<String>,
}

impl Probe {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            port: None,
            path: "/".to_string(),
            host: None,
            expected_code: None,
            expected_output: None,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Send `host` as the Host header (virtual host selection)
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn expect_code(mut self, code: u16) -> Self {
        self.expected_code = Some(code);
        self
    }

    pub fn expect_output(mut self, output: &str) -> Self {
        self.expected_output = Some(output.to_string());
        self
    }

    /// `http://address[:port]/path`; an address that already carries a
    /// scheme keeps it, a bare IPv6 address is bracketed
    pub fn url(&self) -> String {
        let address = self.address.trim_end_matches('/');
        let base = if address.contains("://") {
            address.to_string()
        } else if address.contains(':') && !address.starts_with('[') {
            format!("http://[{}]", address)
        } else {
            format!("http://{}", address)
        };

        let path = self.path.trim_start_matches('/');
        match self.port {
            Some(port) => format!("{}:{}/{}", base, port, path),
            None => format!("{}/{}", base, path),
        }
    }
}

/// Status and body of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: u16,
    pub body: String,
}

impl ProbeResult {
    /// Whether this response satisfies every expectation `probe` sets
    pub fn satisfies(&self, probe: &Probe) -> bool {
        let code_ok = probe
            .expected_code
            .map_or(true, |code| code == self.status);
        let output_ok = probe
            .expected_output
            .as_deref()
            .map_or(true, |needle| self.body.contains(needle));
        code_ok && output_ok
    }
}

pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NctError::Probe(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Issue the request and return what came back
    pub fn fetch(&self, probe: &Probe) -> Result<ProbeResult> {
        let url = probe.url();
        let mut request = self.client.get(&url);
        if let Some(host) = &probe.host {
            request = request.header(HOST, host.as_str());
        }

        let response = request
            .send()
            .map_err(|e| NctError::Probe(format!("GET {} failed: {}", url, e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| NctError::Probe(format!("Reading body of {} failed: {}", url, e)))?;

        debug!(%url, status, bytes = body.len(), "probe response");
        Ok(ProbeResult { status, body })
    }

    /// True when the response meets the expectations. Connection problems
    /// and timeouts count as a failed probe.
    pub fn probe(&self, probe: &Probe) -> bool {
        match self.fetch(probe) {
            Ok(result) if result.satisfies(probe) => true,
            Ok(result) => {
                warn!(
                    url = %probe.url(),
                    status = result.status,
                    expected_code = ?probe.expected_code,
                    expected_output = ?probe.expected_output,
                    "unexpected response"
                );
                false
            }
            Err(e) => {
                warn!(error = %e, "probe failed");
                false
            }
        }
    }
}

/// One-off probe with the default timeout
pub fn probe(
    address: &str,
    port: Option<u16>,
    path: &str,
    host_header: Option<&str>,
    expected_code: Option<u16>,
    expected_substring: Option<&str>,
) -> bool {
    let mut request = Probe::new(address).path(path);
    request.port = port;
    request.host = host_header.map(str::to_string);
    request.expected_code = expected_code;
    request.expected_output = expected_substring.map(str::to_string);

    match HttpProber::new(DEFAULT_PROBE_TIMEOUT) {
        Ok(prober) => prober.probe(&request),
        Err(e) => {
            warn!(error = %e, "probe failed");
            false
        }
    }
}
