//! Client configuration loading and validation.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wfs_common::{WfsError, WfsResult};
use wfs_protocol::{QueryBuilder, DEFAULT_OUTPUT_FORMAT, DEFAULT_WFS_VERSION};

/// Connection and protocol settings for a WFS server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WfsConfig {
    /// Server root, e.g. `http://localhost:8080/geoserver`. Requests go to `<base_url>/wfs`.
    pub base_url: String,
    #[serde(default = "default_wfs_version")]
    pub wfs_version: String,
    /// Output format forced on feature conversion requests.
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Substring marking geometry types in DescribeFeatureType responses.
    #[serde(default = "default_geometry_namespace")]
    pub geometry_namespace: String,
    /// GetFeature response cache lifetime; 0 disables the cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_wfs_version() -> String {
    DEFAULT_WFS_VERSION.to_string()
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_geometry_namespace() -> String {
    "gml:".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl WfsConfig {
    /// Configuration with defaults for everything but the server URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            wfs_version: default_wfs_version(),
            output_format: default_output_format(),
            geometry_namespace: default_geometry_namespace(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// The WFS endpoint requests are sent to.
    pub fn endpoint(&self) -> String {
        format!("{}/wfs", self.base_url.trim_end_matches('/'))
    }

    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(self.wfs_version.as_str())
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> WfsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WfsError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&content)
            .map_err(|e| WfsError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load configuration from `WFS_*` environment variables.
    ///
    /// `WFS_URL` is required; `WFS_VERSION`, `WFS_OUTPUT_FORMAT`,
    /// `WFS_GEOMETRY_NAMESPACE`, `WFS_CACHE_TTL_SECS` and
    /// `WFS_REQUEST_TIMEOUT_SECS` fall back to defaults.
    pub fn from_env() -> WfsResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> WfsResult<Self> {
        let base_url = get("WFS_URL")
            .ok_or_else(|| WfsError::Config("WFS_URL is not set".to_string()))?;

        let mut config = Self::new(base_url);
        if let Some(v) = get("WFS_VERSION") {
            config.wfs_version = v;
        }
        if let Some(v) = get("WFS_OUTPUT_FORMAT") {
            config.output_format = v;
        }
        if let Some(v) = get("WFS_GEOMETRY_NAMESPACE") {
            config.geometry_namespace = v;
        }
        if let Some(v) = get("WFS_CACHE_TTL_SECS") {
            config.cache_ttl_secs = parse_var("WFS_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = get("WFS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("WFS_REQUEST_TIMEOUT_SECS", &v)?;
        }
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> WfsResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(WfsError::Config("base_url must not be empty".to_string()));
        }
        if self.wfs_version.trim().is_empty() {
            return Err(WfsError::Config("wfs_version must not be empty".to_string()));
        }
        if self.geometry_namespace.is_empty() {
            // An empty marker would classify every field as geometry.
            return Err(WfsError::Config(
                "geometry_namespace must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(WfsError::Config(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> WfsResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| WfsError::Config(format!("{} has invalid value '{}'", key, value)))
}
