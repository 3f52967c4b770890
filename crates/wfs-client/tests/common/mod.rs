//! Common test utilities for wfs-client tests
//!
//! Provides an in-memory transport that records every request and answers
//! from a caller-supplied handler.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use wfs_client::{QueryParams, WfsConfig, WfsError, WfsResult, WfsTransport};
use wfs_common::params::keys;

type Handler = Box<dyn Fn(&QueryParams) -> WfsResult<Option<String>> + Send + Sync>;

pub struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<QueryParams>>,
}

impl MockTransport {
    pub fn with_handler(
        handler: impl Fn(&QueryParams) -> WfsResult<Option<String>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with `body`.
    pub fn responding(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::with_handler(move |_| Ok(Some(body.clone())))
    }

    /// Answer every request with an empty document.
    pub fn empty() -> Self {
        Self::with_handler(|_| Ok(None))
    }

    /// Fail every request with a transport error.
    pub fn failing(reason: &str) -> Self {
        let reason = reason.to_string();
        Self::with_handler(move |_| Err(WfsError::Transport(reason.clone())))
    }

    pub fn requests(&self) -> Vec<QueryParams> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> QueryParams {
        self.requests.lock().unwrap().last().cloned().expect("no request issued")
    }
}

#[async_trait]
impl WfsTransport for MockTransport {
    async fn get(&self, params: &QueryParams) -> WfsResult<Option<String>> {
        self.requests.lock().unwrap().push(params.clone());
        (self.handler)(params)
    }
}

/// Config with the response cache disabled.
pub fn uncached_config() -> WfsConfig {
    let mut config = WfsConfig::new("http://localhost:8080/geoserver");
    config.cache_ttl_secs = 0;
    config
}

/// Text value of a request parameter.
pub fn param(params: &QueryParams, key: &str) -> Option<String> {
    params.get(key).map(|v| v.to_string())
}

pub fn sort_by(params: &QueryParams) -> Option<String> {
    param(params, keys::SORT_BY)
}
