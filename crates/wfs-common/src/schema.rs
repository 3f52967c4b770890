//! Feature type schemas discovered through DescribeFeatureType.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{WfsError, WfsResult};

/// One attribute of a feature type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Namespace-qualified type, e.g. `xsd:dateTime` or `gml:PointPropertyType`.
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }

    /// Substring test against the geometry namespace marker (e.g. `gml:`).
    pub fn is_geometry(&self, geometry_marker: &str) -> bool {
        self.field_type.contains(geometry_marker)
    }
}

/// Ordered field descriptors of a feature type, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<FieldDescriptor>", try_from = "Vec<FieldDescriptor>")]
pub struct FeatureTypeSchema {
    fields: Vec<FieldDescriptor>,
}

impl FeatureTypeSchema {
    /// Build a schema, rejecting duplicate field names.
    pub fn new(fields: Vec<FieldDescriptor>) -> WfsResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(WfsError::Parse(format!(
                    "field '{}' is declared more than once",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of all fields whose type does not carry the geometry marker.
    pub fn attribute_names(&self, geometry_marker: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.is_geometry(geometry_marker))
            .map(|f| f.name.as_str())
            .collect()
    }
}

impl TryFrom<Vec<FieldDescriptor>> for FeatureTypeSchema {
    type Error = WfsError;

    fn try_from(fields: Vec<FieldDescriptor>) -> WfsResult<Self> {
        Self::new(fields)
    }
}

impl From<FeatureTypeSchema> for Vec<FieldDescriptor> {
    fn from(schema: FeatureTypeSchema) -> Self {
        schema.fields
    }
}
