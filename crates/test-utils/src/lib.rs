//! Shared test fixtures for the WFS client workspace.
//!
//! Builders for the two document shapes a GeoServer-style WFS 1.1.0 endpoint
//! returns: DescribeFeatureType XML schemas and GetFeature GML collections.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then build documents in your tests:
//!
//! ```ignore
//! use test_utils::{describe_feature_type_xml, feature_collection_xml, gml_feature};
//! ```

pub mod fixtures;

pub use fixtures::*;
