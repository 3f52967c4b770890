//! GML GetFeature documents to GeoJSON-like feature collections.
//!
//! Only attribute values are carried over. Geometry fields are recognised by
//! the geometry namespace marker in their schema type and dropped; the
//! remaining values are kept as raw text.

use std::collections::HashSet;

use wfs_common::{Feature, FeatureCollection, FeatureTypeSchema, WfsError, WfsResult};

use crate::xml::{Document, Element};

/// Local name of the container holding one child per returned feature.
pub const FEATURE_MEMBERS: &str = "featureMembers";

const GML_ID: &str = "gml:id";

/// Schema field names whose type does not contain `geometry_marker`.
pub fn allowed_fields<'a>(schema: &'a FeatureTypeSchema, geometry_marker: &str) -> HashSet<&'a str> {
    schema.attribute_names(geometry_marker).into_iter().collect()
}

/// Convert a GetFeature response into a feature collection.
///
/// Expects exactly one `featureMembers` container (any prefix). A missing or
/// repeated container, or a member without an identifier, is reported as
/// [`WfsError::Parse`]; callers decide whether that degrades to an empty
/// collection.
pub fn convert_feature_members(xml: &str, allowed_fields: &HashSet<&str>) -> WfsResult<FeatureCollection> {
    let doc = Document::parse(xml)?;

    let container = match doc.elements_by_local_name(FEATURE_MEMBERS).as_slice() {
        [one] => *one,
        [] => return Err(WfsError::Parse("no featureMembers container".to_string())),
        many => {
            return Err(WfsError::Parse(format!(
                "expected one featureMembers container, found {}",
                many.len()
            )))
        }
    };

    let mut collection = FeatureCollection::new();
    for member in container.child_elements() {
        let mut feature = Feature::new(feature_id(member)?);
        for child in member.child_elements() {
            if allowed_fields.contains(child.local_name()) {
                feature
                    .properties
                    .insert(child.local_name().to_string(), child.text_content());
            }
        }
        collection.features.push(feature);
    }

    Ok(collection)
}

fn feature_id(member: &Element) -> WfsResult<String> {
    member
        .attribute(GML_ID)
        .or_else(|| member.attribute_by_local_name("id"))
        .map(str::to_string)
        .ok_or_else(|| {
            WfsError::Parse(format!(
                "feature member <{}> has no identifier",
                member.qualified_name()
            ))
        })
}
