use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, YrError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("yr-core/", env!("CARGO_PKG_VERSION"));

/// Retrieves raw bytes for a URL.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| YrError::Network {
                url: String::new(),
                status: None,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let network = |status: Option<u16>, message: String| YrError::Network {
            url: url.to_string(),
            status,
            message,
        };

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| network(None, format!("request failed: {e}")))?;

        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|e| network(Some(status.as_u16()), format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(network(
                Some(status.as_u16()),
                format!(
                    "request failed with status {}: {}",
                    status,
                    truncate_body(&String::from_utf8_lossy(&body))
                ),
            ));
        }

        Ok(body.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
