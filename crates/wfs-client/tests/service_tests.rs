//! Integration tests for WebFeatureService over an in-memory transport.

mod common;

use common::{param, sort_by, uncached_config, MockTransport};
use test_utils::{describe_feature_type_xml, feature_collection_xml, gml_feature, scenarios};
use tokio_test::{assert_err, assert_ok};
use wfs_client::{
    Feature, FeatureCollection, FeatureTypeSchema, FieldDescriptor, QueryParams, SortDirection,
    TemporalExtent, WebFeatureService, WfsConfig, WfsError,
};
use wfs_common::params::keys;

fn layer_schema() -> FeatureTypeSchema {
    FeatureTypeSchema::new(vec![
        FieldDescriptor::new("start_time", "xsd:dateTime"),
        FieldDescriptor::new("geom", "gml:MultiPolygonPropertyType"),
    ])
    .unwrap()
}

fn service(transport: MockTransport) -> WebFeatureService<MockTransport> {
    WebFeatureService::with_transport(transport, &uncached_config())
}

// ============================================================================
// Schema introspection
// ============================================================================

#[tokio::test]
async fn test_describe_feature_type_request() {
    let wfs = service(MockTransport::responding(scenarios::layer_schema_xml()));

    let doc = assert_ok!(wfs.describe_feature_type("layer", "ws").await);
    assert!(doc.is_some());

    let request = wfs.transport().last_request();
    assert_eq!(param(&request, keys::REQUEST).as_deref(), Some("DescribeFeatureType"));
    assert_eq!(param(&request, keys::TYPE_NAME).as_deref(), Some("ws:layer"));
    assert_eq!(param(&request, keys::VERSION).as_deref(), Some("1.1.0"));
    assert_eq!(request.len(), 3);
}

#[tokio::test]
async fn test_extract_fields_scenario() {
    let wfs = service(MockTransport::responding(scenarios::layer_schema_xml()));

    let schema = assert_ok!(wfs.extract_fields_and_types(scenarios::LAYER, scenarios::WORKSPACE).await);
    assert_eq!(schema, layer_schema());
}

#[tokio::test]
async fn test_extract_fields_transport_failure() {
    let wfs = service(MockTransport::failing("connection refused"));

    let err = assert_err!(wfs.extract_fields_and_types("layer", "ws").await);
    assert_eq!(err, WfsError::Transport("connection refused".to_string()));
}

#[tokio::test]
async fn test_extract_fields_empty_response() {
    let wfs = service(MockTransport::empty());

    let err = assert_err!(wfs.extract_fields_and_types("layer", "ws").await);
    assert!(matches!(err, WfsError::EmptyResponse(_)));
}

#[tokio::test]
async fn test_extract_fields_unparseable() {
    let wfs = service(MockTransport::responding("<ServiceExceptionReport/>"));

    let err = assert_err!(wfs.extract_fields_and_types("layer", "ws").await);
    assert!(matches!(err, WfsError::Parse(_)));
}

#[tokio::test]
async fn test_extract_fields_mismatched_layer_fails_instead_of_hanging() {
    let wfs = service(MockTransport::responding(describe_feature_type_xml(
        "ws",
        "other",
        &[("a", "xsd:int")],
    )));

    let err = assert_err!(wfs.extract_fields_and_types("layer", "ws").await);
    assert!(matches!(err, WfsError::SchemaMismatch { .. }));
}

// ============================================================================
// Feature conversion
// ============================================================================

#[tokio::test]
async fn test_features_as_json_single_feature_scenario() {
    let wfs = service(MockTransport::responding(scenarios::single_feature_xml()));

    let fc = assert_ok!(
        wfs.get_features_as_json("layer", "ws", &layer_schema(), &QueryParams::new())
            .await
    );
    assert_eq!(
        fc,
        FeatureCollection::new().with_feature(
            Feature::new("layer.1").with_property("start_time", "2020-01-01T00:00:00Z")
        )
    );
}

#[tokio::test]
async fn test_features_as_json_forces_output_format() {
    let wfs = service(MockTransport::responding(scenarios::zero_members_xml()));
    let params = QueryParams::new()
        .with(keys::OUTPUT_FORMAT, "application/json")
        .with(keys::CQL_FILTER, "start_time AFTER 2020-01-01T00:00:00Z");

    assert_ok!(wfs.get_features_as_json("layer", "ws", &layer_schema(), &params).await);

    let request = wfs.transport().last_request();
    assert_eq!(param(&request, keys::REQUEST).as_deref(), Some("GetFeature"));
    assert_eq!(
        param(&request, keys::OUTPUT_FORMAT).as_deref(),
        Some("text/xml; subtype=gml/3.1.1")
    );
    assert!(request.contains_key(keys::CQL_FILTER));
}

#[tokio::test]
async fn test_features_as_json_zero_members_scenario() {
    let wfs = service(MockTransport::responding(scenarios::zero_members_xml()));

    let fc = assert_ok!(
        wfs.get_features_as_json("layer", "ws", &layer_schema(), &QueryParams::new())
            .await
    );
    assert_eq!(fc, FeatureCollection::new());
}

#[tokio::test]
async fn test_features_as_json_degrades_on_bad_documents() {
    for body in [
        test_utils::empty_feature_collection_xml(),
        "<c><gml:featureMembers/><gml:featureMembers/></c>".to_string(),
        "<broken>".to_string(),
    ] {
        let wfs = service(MockTransport::responding(body));
        let fc = assert_ok!(
            wfs.get_features_as_json("layer", "ws", &layer_schema(), &QueryParams::new())
                .await
        );
        assert!(fc.is_empty());
    }

    let wfs = service(MockTransport::empty());
    let fc = assert_ok!(
        wfs.get_features_as_json("layer", "ws", &layer_schema(), &QueryParams::new())
            .await
    );
    assert!(fc.is_empty());
}

#[tokio::test]
async fn test_features_as_json_propagates_transport_failure() {
    let wfs = service(MockTransport::failing("HTTP 503"));

    let err = assert_err!(
        wfs.get_features_as_json("layer", "ws", &layer_schema(), &QueryParams::new())
            .await
    );
    assert!(matches!(err, WfsError::Transport(_)));
}

#[tokio::test]
async fn test_filtered_features_extended_params_win() {
    let wfs = service(MockTransport::responding(scenarios::zero_members_xml()));
    let filters = QueryParams::new()
        .with(keys::CQL_FILTER, "a = 1")
        .with(keys::MAX_FEATURES, 50u32);
    let extended = QueryParams::new().with(keys::MAX_FEATURES, 5u32);

    assert_ok!(
        wfs.get_filtered_json_features("layer", "ws", &layer_schema(), &filters, Some(&extended))
            .await
    );
    let request = wfs.transport().last_request();
    assert_eq!(param(&request, keys::MAX_FEATURES).as_deref(), Some("5"));
    assert_eq!(param(&request, keys::CQL_FILTER).as_deref(), Some("a = 1"));

    assert_ok!(
        wfs.get_filtered_json_features("layer", "ws", &layer_schema(), &filters, None)
            .await
    );
    let request = wfs.transport().last_request();
    assert_eq!(param(&request, keys::MAX_FEATURES).as_deref(), Some("50"));
}

// ============================================================================
// Temporal extrema
// ============================================================================

#[tokio::test]
async fn test_find_time_min_single_record() {
    let xml = feature_collection_xml(
        &["ws"],
        &[gml_feature("ws", "layer", "layer.3", &[("start_time", "2018-07-04T12:00:00Z")])],
    );
    let wfs = service(MockTransport::responding(xml));

    let min = assert_ok!(wfs.find_time_min("layer", "ws", "start_time").await);
    assert_eq!(min, "2018-07-04T12:00:00Z");

    let request = wfs.transport().last_request();
    assert_eq!(param(&request, keys::MAX_FEATURES).as_deref(), Some("1"));
    assert_eq!(sort_by(&request).as_deref(), Some("start_time A"));
    assert!(!request.contains_key(keys::OUTPUT_FORMAT));
}

#[tokio::test]
async fn test_find_time_max_sorts_descending() {
    let wfs = service(MockTransport::responding(scenarios::mixed_prefix_extrema_xml()));

    assert_ok!(wfs.find_time_max("layer", "ws2", "start_time").await);
    assert_eq!(
        sort_by(&wfs.transport().last_request()).as_deref(),
        Some("start_time D")
    );
}

#[tokio::test]
async fn test_find_time_min_max_workspace_prefix_scenario() {
    let wfs = service(MockTransport::responding(scenarios::mixed_prefix_extrema_xml()));

    let value = assert_ok!(
        wfs.find_time_min_max("layer", "ws2", "start_time", SortDirection::Ascending)
            .await
    );
    assert_eq!(value, "B");
}

#[tokio::test]
async fn test_find_time_no_records() {
    let wfs = service(MockTransport::responding(scenarios::zero_members_xml()));

    let err = assert_err!(wfs.find_time_min("layer", "ws", "start_time").await);
    assert_eq!(err, WfsError::FieldNotFound("start_time".to_string()));

    let wfs = service(MockTransport::empty());
    let err = assert_err!(wfs.find_time_max("layer", "ws", "start_time").await);
    assert!(err.is_no_data());
}

#[tokio::test]
async fn test_find_time_prefix_mismatch() {
    let wfs = service(MockTransport::responding(scenarios::mixed_prefix_extrema_xml()));

    let err = assert_err!(wfs.find_time_min("layer", "ws3", "start_time").await);
    assert!(matches!(err, WfsError::PrefixMismatch { .. }));
}

#[tokio::test]
async fn test_find_time_transport_failure() {
    let wfs = service(MockTransport::failing("timeout"));

    let err = assert_err!(wfs.find_time_min("layer", "ws", "start_time").await);
    assert_eq!(err, WfsError::Transport("timeout".to_string()));
}

#[tokio::test]
async fn test_find_time_extent_issues_both_queries() {
    let transport = MockTransport::with_handler(|params| {
        let value = match sort_by(params).as_deref() {
            Some("start_time A") => "2001-01-01T00:00:00Z",
            Some("start_time D") => "2009-12-31T00:00:00Z",
            other => panic!("unexpected sortby {:?}", other),
        };
        Ok(Some(feature_collection_xml(
            &["ws"],
            &[gml_feature("ws", "layer", "layer.1", &[("start_time", value)])],
        )))
    });
    let wfs = service(transport);

    let extent = assert_ok!(wfs.find_time_extent("layer", "ws", "start_time").await);
    assert_eq!(
        extent,
        TemporalExtent::new("2001-01-01T00:00:00Z", "2009-12-31T00:00:00Z")
    );
    assert_eq!(wfs.transport().request_count(), 2);

    let (min, max) = assert_ok!(extent.to_datetimes());
    assert!(min < max);
}

// ============================================================================
// Data presence
// ============================================================================

#[tokio::test]
async fn test_is_data_present_with_one_feature() {
    let wfs = service(MockTransport::responding(scenarios::single_feature_xml()));
    let filter = QueryParams::new().with(keys::CQL_FILTER, "start_time AFTER 2019-01-01T00:00:00Z");

    assert!(wfs.is_data_present("layer", "ws", &layer_schema(), &filter).await);

    let request = wfs.transport().last_request();
    assert_eq!(param(&request, keys::MAX_FEATURES).as_deref(), Some("1"));
    assert!(request.contains_key(keys::CQL_FILTER));
}

#[tokio::test]
async fn test_is_data_present_false_cases() {
    let schema = layer_schema();
    let filter = QueryParams::new();

    let wfs = service(MockTransport::responding(scenarios::zero_members_xml()));
    assert!(!wfs.is_data_present("layer", "ws", &schema, &filter).await);

    let wfs = service(MockTransport::failing("connection reset"));
    assert!(!wfs.is_data_present("layer", "ws", &schema, &filter).await);

    // A server ignoring maxFeatures is not "exactly one".
    let two = feature_collection_xml(
        &["ws"],
        &[
            gml_feature("ws", "layer", "layer.1", &[]),
            gml_feature("ws", "layer", "layer.2", &[]),
        ],
    );
    let wfs = service(MockTransport::responding(two));
    assert!(!wfs.is_data_present("layer", "ws", &schema, &filter).await);
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_get_feature_served_from_cache() {
    let config = WfsConfig::new("http://localhost:8080/geoserver");
    let wfs = WebFeatureService::with_transport(
        MockTransport::responding(scenarios::single_feature_xml()),
        &config,
    );
    let params = QueryParams::new().with(keys::MAX_FEATURES, 1u32);

    let first = assert_ok!(wfs.get_feature("layer", "ws", &params).await);
    let second = assert_ok!(wfs.get_feature("layer", "ws", &params).await);
    assert_eq!(first, second);
    assert_eq!(wfs.transport().request_count(), 1);

    // A different signature goes to the server.
    let other = QueryParams::new().with(keys::MAX_FEATURES, 2u32);
    assert_ok!(wfs.get_feature("layer", "ws", &other).await);
    assert_eq!(wfs.transport().request_count(), 2);

    let cache = wfs.cache().expect("cache enabled by default");
    assert_eq!(cache.stats().hits(), 1);

    cache.invalidate().await;
    assert_ok!(wfs.get_feature("layer", "ws", &params).await);
    assert_eq!(wfs.transport().request_count(), 3);
}

#[tokio::test]
async fn test_separator_characters_do_not_collide_in_cache() {
    let config = WfsConfig::new("http://localhost:8080/geoserver");
    let wfs = WebFeatureService::with_transport(
        MockTransport::responding(scenarios::single_feature_xml()),
        &config,
    );
    let joined = QueryParams::new().with(keys::CQL_FILTER, "name='a&maxFeatures=1'");
    let split = QueryParams::new()
        .with(keys::CQL_FILTER, "name='a")
        .with(keys::MAX_FEATURES, "1'");

    assert_ok!(wfs.get_feature("layer", "ws", &joined).await);
    assert_ok!(wfs.get_feature("layer", "ws", &split).await);

    assert_eq!(wfs.transport().request_count(), 2);
    let last = wfs.transport().last_request();
    assert_eq!(param(&last, keys::MAX_FEATURES).as_deref(), Some("1'"));
}

#[tokio::test]
async fn test_describe_feature_type_is_not_cached() {
    let config = WfsConfig::new("http://localhost:8080/geoserver");
    let wfs = WebFeatureService::with_transport(
        MockTransport::responding(scenarios::layer_schema_xml()),
        &config,
    );

    assert_ok!(wfs.extract_fields_and_types("layer", "ws").await);
    assert_ok!(wfs.extract_fields_and_types("layer", "ws").await);
    assert_eq!(wfs.transport().request_count(), 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let config = WfsConfig::new("http://localhost:8080/geoserver");
    let wfs = WebFeatureService::with_transport(MockTransport::failing("boom"), &config);

    assert_err!(wfs.get_feature("layer", "ws", &QueryParams::new()).await);
    assert_err!(wfs.get_feature("layer", "ws", &QueryParams::new()).await);
    assert_eq!(wfs.transport().request_count(), 2);
    assert_eq!(wfs.cache().map(|c| c.stats().hits()), Some(0));
}
