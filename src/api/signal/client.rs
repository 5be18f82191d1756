use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::ApiError;
use crate::models::Snapshot;

/// Client for the signal data endpoint (`GET /api/data`)
pub struct SignalClient {
    http_client: HttpClient,
    url: String,
}

impl SignalClient {
    /// Create a client for `url`. `timeout` of `None` waits indefinitely.
    pub fn new(url: String, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = HttpClient::builder().default_headers(Self::create_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client, url })
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("signal-watch/", env!("CARGO_PKG_VERSION"))),
        );
        headers
    }

    /// Fetch one snapshot.
    ///
    /// # Returns
    /// * `Ok(Snapshot)` - the decoded payload
    /// * `Err(ApiError)` - transport failure, non-2xx status, bad JSON, or a
    ///   payload carrying an `error` descriptor
    pub async fn get_snapshot(&self) -> Result<Snapshot, ApiError> {
        debug!("GET {}", self.url);

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Signal endpoint returned {}", status);
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Self::decode_snapshot(&body)
    }

    /// Decode a 2xx body, turning an embedded `error` descriptor into an error
    pub fn decode_snapshot(body: &str) -> Result<Snapshot, ApiError> {
        let snapshot: Snapshot =
            serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

        match snapshot.reported_error() {
            Some((error, details)) => Err(ApiError::Reported { error, details }),
            None => Ok(snapshot),
        }
    }
}
