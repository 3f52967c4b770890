//! Request transport for WFS key-value-pair GET requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use wfs_common::params::keys;
use wfs_common::{QueryParams, WfsError, WfsResult};

use crate::config::WfsConfig;

/// Issues one WFS request and returns the response document.
///
/// `Ok(None)` means the server answered successfully with an empty body.
/// Failures are reported as [`WfsError::Transport`] carrying the upstream reason.
#[async_trait]
pub trait WfsTransport: Send + Sync {
    async fn get(&self, params: &QueryParams) -> WfsResult<Option<String>>;
}

#[async_trait]
impl<T: WfsTransport + ?Sized> WfsTransport for Arc<T> {
    async fn get(&self, params: &QueryParams) -> WfsResult<Option<String>> {
        (**self).get(params).await
    }
}

/// HTTP GET transport against `<base_url>/wfs`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &WfsConfig) -> WfsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| WfsError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WfsTransport for HttpTransport {
    async fn get(&self, params: &QueryParams) -> WfsResult<Option<String>> {
        let request = params
            .get(keys::REQUEST)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "WFS".to_string());

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params.to_pairs())
            .send()
            .await
            .map_err(|e| WfsError::Transport(format!("{} request failed: {}", request, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WfsError::Transport(format!(
                "{} request returned HTTP {}",
                request, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WfsError::Transport(format!("{} response unreadable: {}", request, e)))?;

        debug!(request = %request, bytes = body.len(), "WFS response received");

        if body.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(body))
        }
    }
}
