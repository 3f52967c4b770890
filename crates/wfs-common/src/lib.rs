//! Common types and utilities shared across the WFS client crates.

pub mod error;
pub mod feature;
pub mod layer;
pub mod params;
pub mod schema;
pub mod time;

pub use error::{WfsError, WfsResult};
pub use feature::{Feature, FeatureCollection};
pub use layer::TypeName;
pub use params::{ParamValue, QueryParams};
pub use schema::{FeatureTypeSchema, FieldDescriptor};
pub use time::{SortDirection, TemporalExtent};
