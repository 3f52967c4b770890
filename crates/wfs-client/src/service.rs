//! High-level WFS operations.
//!
//! Each call issues at most one request (two for [`find_time_extent`]) and
//! keeps no state between calls apart from the GetFeature response cache.
//!
//! [`find_time_extent`]: WebFeatureService::find_time_extent

use tracing::{debug, warn};
use wfs_common::params::keys;
use wfs_common::{
    FeatureCollection, FeatureTypeSchema, QueryParams, SortDirection, TemporalExtent, TypeName,
    WfsError, WfsResult,
};
use wfs_protocol::{
    allowed_fields, convert_feature_members, extract_extremum, parse_feature_type_schema,
    QueryBuilder, WfsOperation,
};

use crate::cache::ResponseCache;
use crate::config::WfsConfig;
use crate::transport::{HttpTransport, WfsTransport};

/// WFS client for one server.
pub struct WebFeatureService<T> {
    transport: T,
    queries: QueryBuilder,
    output_format: String,
    geometry_namespace: String,
    cache: Option<ResponseCache>,
}

impl WebFeatureService<HttpTransport> {
    /// Validate `config` and connect over HTTP.
    pub fn from_config(config: &WfsConfig) -> WfsResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: WfsTransport> WebFeatureService<T> {
    pub fn with_transport(transport: T, config: &WfsConfig) -> Self {
        let cache = (config.cache_ttl_secs > 0).then(|| ResponseCache::new(config.cache_ttl_secs));
        Self {
            transport,
            queries: config.query_builder(),
            output_format: config.output_format.clone(),
            geometry_namespace: config.geometry_namespace.clone(),
            cache,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn geometry_namespace(&self) -> &str {
        &self.geometry_namespace
    }

    /// Raw DescribeFeatureType document for `workspace:name`.
    pub async fn describe_feature_type(&self, name: &str, workspace: &str) -> WfsResult<Option<String>> {
        let type_name = TypeName::new(workspace, name);
        let params = self
            .queries
            .build(WfsOperation::DescribeFeatureType, &type_name, &QueryParams::new());

        match self.transport.get(&params).await {
            Ok(doc) => {
                debug!(type_name = %type_name, "Successfully retrieved DescribeFeatureType result");
                Ok(doc)
            }
            Err(e) => {
                warn!(type_name = %type_name, error = %e, "Error retrieving DescribeFeatureType result");
                Err(e)
            }
        }
    }

    /// Field names and types of `workspace:name`, in declaration order.
    pub async fn extract_fields_and_types(&self, name: &str, workspace: &str) -> WfsResult<FeatureTypeSchema> {
        let xml = match self.describe_feature_type(name, workspace).await? {
            Some(xml) => xml,
            None => {
                let e = WfsError::EmptyResponse(format!(
                    "Null response received from DescribeFeatureType for {}:{}",
                    workspace, name
                ));
                warn!(error = %e, "Unable to extract fields");
                return Err(e);
            }
        };

        parse_feature_type_schema(&xml, name).map_err(|e| {
            warn!(workspace = workspace, layer = name, kind = e.kind(), error = %e, "Unable to extract fields");
            e
        })
    }

    /// Raw GetFeature document. Served from the cache when an identical
    /// request is still fresh.
    pub async fn get_feature(&self, name: &str, workspace: &str, params: &QueryParams) -> WfsResult<Option<String>> {
        let type_name = TypeName::new(workspace, name);
        let params = self.queries.build(WfsOperation::GetFeature, &type_name, params);
        let signature = params.signature();

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(&signature).await {
                return Ok(Some(body));
            }
        }

        match self.transport.get(&params).await {
            Ok(doc) => {
                debug!(type_name = %type_name, "Successfully retrieved GetFeature result");
                if let (Some(cache), Some(body)) = (&self.cache, &doc) {
                    cache.insert(signature, body.clone()).await;
                }
                Ok(doc)
            }
            Err(e) => {
                warn!(type_name = %type_name, error = %e, "Error retrieving GetFeature result");
                Err(e)
            }
        }
    }

    /// Features of `workspace:name` as a GeoJSON-like collection without geometry.
    ///
    /// Only transport failures are errors. A response without a single
    /// feature members container (or one that cannot be parsed) is logged
    /// and yields an empty collection.
    pub async fn get_features_as_json(
        &self,
        name: &str,
        workspace: &str,
        schema: &FeatureTypeSchema,
        params: &QueryParams,
    ) -> WfsResult<FeatureCollection> {
        let allowed = allowed_fields(schema, &self.geometry_namespace);
        let params = params.merged(&QueryParams::new().with(keys::OUTPUT_FORMAT, self.output_format.as_str()));

        let converted = match self.get_feature(name, workspace, &params).await? {
            Some(xml) => convert_feature_members(&xml, &allowed),
            None => Err(WfsError::EmptyResponse("GetFeature returned no document".to_string())),
        };

        match converted {
            Ok(collection) => Ok(collection),
            Err(e) => {
                warn!(
                    workspace = workspace,
                    layer = name,
                    params = %params.signature(),
                    reason = %e,
                    "Unable to find any features"
                );
                Ok(FeatureCollection::new())
            }
        }
    }

    /// [`get_features_as_json`](Self::get_features_as_json) with `filters`
    /// merged with `extended_params`; extended params win on collision.
    pub async fn get_filtered_json_features(
        &self,
        name: &str,
        workspace: &str,
        schema: &FeatureTypeSchema,
        filters: &QueryParams,
        extended_params: Option<&QueryParams>,
    ) -> WfsResult<FeatureCollection> {
        let params = match extended_params {
            Some(extended) => filters.merged(extended),
            None => filters.clone(),
        };
        self.get_features_as_json(name, workspace, schema, &params).await
    }

    /// First value of `field` when sorted in `direction`, read from a
    /// single-record query.
    ///
    /// The value must appear on an element prefixed with `workspace`; if the
    /// response holds several such elements, the last one wins.
    pub async fn find_time_min_max(
        &self,
        name: &str,
        workspace: &str,
        field: &str,
        direction: SortDirection,
    ) -> WfsResult<String> {
        let params = QueryBuilder::extremum_params(field, direction);

        let doc = self.get_feature(name, workspace, &params).await.map_err(|e| {
            warn!(field = field, "Unable to identify a min/max time for field");
            e
        })?;

        let value = match doc {
            Some(xml) => extract_extremum(&xml, field, workspace),
            None => Err(WfsError::FieldNotFound(field.to_string())),
        };

        if let Err(e) = &value {
            warn!(workspace = workspace, layer = name, field = field, kind = e.kind(), error = %e, "Extrema lookup failed");
        }
        value
    }

    pub async fn find_time_min(&self, name: &str, workspace: &str, field: &str) -> WfsResult<String> {
        self.find_time_min_max(name, workspace, field, SortDirection::Ascending)
            .await
    }

    pub async fn find_time_max(&self, name: &str, workspace: &str, field: &str) -> WfsResult<String> {
        self.find_time_min_max(name, workspace, field, SortDirection::Descending)
            .await
    }

    /// Earliest and latest value of `field`, queried concurrently.
    pub async fn find_time_extent(&self, name: &str, workspace: &str, field: &str) -> WfsResult<TemporalExtent> {
        let (min, max) = tokio::try_join!(
            self.find_time_min(name, workspace, field),
            self.find_time_max(name, workspace, field),
        )?;
        Ok(TemporalExtent { min, max })
    }

    /// Whether a record matches `filter`.
    ///
    /// Requests at most one feature and is `true` only when the converted
    /// collection holds exactly one. Never fails: every error is logged and
    /// reported as `false`.
    pub async fn is_data_present(
        &self,
        name: &str,
        workspace: &str,
        schema: &FeatureTypeSchema,
        filter: &QueryParams,
    ) -> bool {
        let single = QueryParams::new().with(keys::MAX_FEATURES, 1u32);
        match self
            .get_filtered_json_features(name, workspace, schema, filter, Some(&single))
            .await
        {
            Ok(collection) => collection.len() == 1,
            Err(e) => {
                warn!(workspace = workspace, layer = name, error = %e, "Error attempting to determine if data is present");
                false
            }
        }
    }
}
