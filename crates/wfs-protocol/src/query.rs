//! WFS key-value-pair request construction.

use wfs_common::params::keys;
use wfs_common::{QueryParams, SortDirection, TypeName};

/// WFS 1.1.0 is used deliberately: 2.0.0 always runs a full table scan to
/// compute `numberMatched`, which is unacceptable on large layers.
pub const DEFAULT_WFS_VERSION: &str = "1.1.0";

/// GML 3.1.1, the format the feature converter parses.
pub const DEFAULT_OUTPUT_FORMAT: &str = "text/xml; subtype=gml/3.1.1";

/// WFS operations issued by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WfsOperation {
    DescribeFeatureType,
    GetFeature,
}

impl WfsOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            WfsOperation::DescribeFeatureType => "DescribeFeatureType",
            WfsOperation::GetFeature => "GetFeature",
        }
    }
}

impl std::fmt::Display for WfsOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composes request parameters for a fixed protocol version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    version: String,
}

impl QueryBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Base `{version, request, typeName}` merged with `overrides`.
    /// Overrides win on key collision.
    pub fn build(
        &self,
        operation: WfsOperation,
        type_name: &TypeName,
        overrides: &QueryParams,
    ) -> QueryParams {
        QueryParams::new()
            .with(keys::VERSION, self.version.as_str())
            .with(keys::REQUEST, operation.as_str())
            .with(keys::TYPE_NAME, type_name.to_string())
            .merged(overrides)
    }

    /// Single record sorted on `field`, used to find its minimum or maximum.
    pub fn extremum_params(field: &str, direction: SortDirection) -> QueryParams {
        QueryParams::new()
            .with(keys::MAX_FEATURES, 1u32)
            .with(keys::SORT_BY, direction.sort_by(field))
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WFS_VERSION)
    }
}
