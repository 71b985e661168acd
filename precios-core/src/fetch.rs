//! HTTP retrieval of report payloads

use crate::error::FetchError;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Declared payload format, decided by configuration rather than sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadFormat {
    /// An Excel workbook (.xlsx/.xls/.ods)
    Workbook,
    /// Comma-delimited text with standard quoting
    DelimitedText,
}

/// Raw bytes of a fetched report plus their declared format
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub bytes: Vec<u8>,
    pub format: PayloadFormat,
}

/// The fetch seam. The resolver only needs "address in, payload or typed
/// failure out", which also lets tests drive the pipeline without a server.
pub trait Fetcher {
    fn fetch(&self, address: &str) -> Result<RawPayload, FetchError>;
}

/// Blocking HTTP fetcher. Performs exactly one request per call; retrying
/// is the resolver's job and takes the form of trying the next candidate
/// date, never re-hitting the same address.
pub struct HttpFetcher {
    client: Client,
    headers: Vec<(String, String)>,
    format: PayloadFormat,
}

impl HttpFetcher {
    pub fn new(
        timeout: Duration,
        headers: Vec<(String, String)>,
        format: PayloadFormat,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            headers,
            format,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, address: &str) -> Result<RawPayload, FetchError> {
        let mut request = self.client.get(address);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().map_err(|e| FetchError::Transport {
            address: address.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(address.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Transport {
                address: address.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Transport {
                address: address.to_string(),
                message: e.to_string(),
            })?
            .to_vec();
        debug!(address, len = bytes.len(), "downloaded report payload");

        Ok(RawPayload {
            bytes,
            format: self.format,
        })
    }
}
