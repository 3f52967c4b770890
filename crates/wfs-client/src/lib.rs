//! Async client for OGC Web Feature Services.
//!
//! This crate provides:
//! - Feature type schema discovery (DescribeFeatureType)
//! - GML GetFeature responses converted to GeoJSON-like collections
//! - Temporal extrema via sorted single-record queries
//! - Data presence checks
//! - A TTL cache for GetFeature responses

pub mod cache;
pub mod config;
pub mod service;
pub mod transport;

pub use cache::{CacheStats, ResponseCache};
pub use config::WfsConfig;
pub use service::WebFeatureService;
pub use transport::{HttpTransport, WfsTransport};

pub use wfs_common::params::keys;
pub use wfs_common::{
    Feature, FeatureCollection, FeatureTypeSchema, FieldDescriptor, QueryParams, SortDirection,
    TemporalExtent, TypeName, WfsError, WfsResult,
};
