//! GeoJSON-like feature records produced from GML documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::WfsResult;

/// A single feature: identifier plus raw text attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Namespaced identifier from the source document, e.g. `layer.1`.
    pub id: String,

    pub properties: BTreeMap<String, String>,
}

impl Feature {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: id.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Set a property; a later value for the same name overwrites.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// An ordered collection of features. Empty means "no matching records".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_json(&self) -> WfsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}
