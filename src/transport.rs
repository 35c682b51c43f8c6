use std::time::Duration;

use log::debug;
use thiserror::Error;
use url::Url;

use crate::feed::RawFeedRecord;

pub const DEFAULT_HOST: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_RESOURCE: &str = "/downapp/sample/main/sample.json";

/// The single remote operation the feed needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub host: String,
    pub resource: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            timeout: crate::http::DEFAULT_TIMEOUT,
        }
    }
}

impl Endpoint {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// The host with its path replaced by the resource.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.host)?;
        url.set_path(&self.resource);
        Ok(url)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("server responded with status {status}")]
    InvalidResponse { status: u16, body: Vec<u8> },
    #[error("failed to decode feed: {0}")]
    Decoding(#[from] serde_json::Error),
    #[error("unexpected transport failure: {0}")]
    Unexpected(String),
}

/// Fetches the raw feed. One attempt per call, no retries.
pub trait FeedTransport {
    fn fetch_feed(&self) -> Result<Vec<RawFeedRecord>, TransportError>;
}

impl<F> FeedTransport for F
where
    F: Fn() -> Result<Vec<RawFeedRecord>, TransportError>,
{
    fn fetch_feed(&self) -> Result<Vec<RawFeedRecord>, TransportError> {
        self()
    }
}

pub struct HttpFeedTransport {
    client: reqwest::blocking::Client,
    url: Url,
    headers: Vec<(String, String)>,
}

impl HttpFeedTransport {
    pub fn new(endpoint: &Endpoint) -> anyhow::Result<Self> {
        let url = endpoint
            .url()
            .map_err(|e| anyhow::anyhow!("invalid feed host {:?}: {}", endpoint.host, e))?;
        Ok(Self {
            client: crate::http::http_client(endpoint.timeout)?,
            url,
            headers: endpoint.headers.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FeedTransport for HttpFeedTransport {
    fn fetch_feed(&self) -> Result<Vec<RawFeedRecord>, TransportError> {
        debug!("GET {}", self.url);
        let request = self
            .headers
            .iter()
            .fold(self.client.get(self.url.clone()), |request, (name, value)| {
                request.header(name.as_str(), value.as_str())
            });

        let response = request
            .send()
            .map_err(|e| TransportError::Unexpected(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| TransportError::Unexpected(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::InvalidResponse {
                status: status.as_u16(),
                body: body.to_vec(),
            });
        }

        decode_feed(&body)
    }
}

pub(crate) fn decode_feed(body: &[u8]) -> Result<Vec<RawFeedRecord>, TransportError> {
    if body.is_empty() {
        return Err(TransportError::Unexpected("empty response body".to_string()));
    }
    Ok(serde_json::from_slice(body)?)
}
