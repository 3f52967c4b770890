//! OGC WFS protocol implementation.
//!
//! Supports the WFS 1.1.0 key-value-pair binding as served by GeoServer:
//! - DescribeFeatureType: XML schema introspection into field descriptors
//! - GetFeature: GML 3.1.1 feature collections converted to GeoJSON-like records
//! - Sorted single-record GetFeature queries for temporal extrema

pub mod describe;
pub mod extrema;
pub mod gml;
pub mod query;
pub mod xml;

pub use describe::parse_feature_type_schema;
pub use extrema::extract_extremum;
pub use gml::{allowed_fields, convert_feature_members};
pub use query::{QueryBuilder, WfsOperation, DEFAULT_OUTPUT_FORMAT, DEFAULT_WFS_VERSION};
pub use xml::{Document, Element, Node};
