//! DescribeFeatureType schema introspection.
//!
//! GeoServer answers DescribeFeatureType with an XML schema of the form
//!
//! ```text
//! xsd:schema
//!   xsd:complexType name="<layer>Type"
//!     xsd:complexContent
//!       xsd:extension base="gml:AbstractFeatureType"
//!         xsd:sequence
//!           xsd:element name=".." type=".."   (one per field)
//!   xsd:element name="<layer>" type="<ws>:<layer>Type"
//! ```
//!
//! Nodes are located by local name rather than by position, so indentation
//! text nodes and extra wrapper elements do not matter.

use tracing::debug;
use wfs_common::{FeatureTypeSchema, FieldDescriptor, WfsError, WfsResult};

use crate::xml::{Document, Element};

const COMPLEX_TYPE: &str = "complexType";
const SEQUENCE: &str = "sequence";
const ELEMENT: &str = "element";
const TYPE_SUFFIX: &str = "Type";

/// Parse a DescribeFeatureType response into the field schema of `name`.
///
/// Fails with [`WfsError::Parse`] when the document has no named complex
/// type or no field sequence, and with [`WfsError::SchemaMismatch`] when the
/// complex type describes a different layer.
pub fn parse_feature_type_schema(xml: &str, name: &str) -> WfsResult<FeatureTypeSchema> {
    let doc = Document::parse(xml)?;

    let complex_type = doc
        .elements_by_local_name(COMPLEX_TYPE)
        .into_iter()
        .next()
        .ok_or_else(|| unparseable("no complexType declaration"))?;

    let type_name = complex_type
        .attribute("name")
        .ok_or_else(|| unparseable("complexType has no name attribute"))?;

    let declared = type_name.strip_suffix(TYPE_SUFFIX).unwrap_or(type_name);
    if declared != name {
        return Err(WfsError::SchemaMismatch {
            expected: name.to_string(),
            found: declared.to_string(),
        });
    }

    let sequence = complex_type
        .descendants_by_local_name(SEQUENCE)
        .into_iter()
        .next()
        .ok_or_else(|| unparseable(&format!("complexType '{}' has no field sequence", type_name)))?;

    let fields = sequence
        .child_elements()
        .filter(|e| e.local_name() == ELEMENT)
        .map(field_descriptor)
        .collect::<WfsResult<Vec<_>>>()?;

    debug!(layer = name, fields = fields.len(), "Parsed feature type schema");
    FeatureTypeSchema::new(fields)
}

fn field_descriptor(element: &Element) -> WfsResult<FieldDescriptor> {
    let name = element
        .attribute("name")
        .ok_or_else(|| unparseable("field element has no name attribute"))?;
    let field_type = element
        .attribute("type")
        .ok_or_else(|| unparseable(&format!("field '{}' has no type attribute", name)))?;
    Ok(FieldDescriptor::new(name, field_type))
}

fn unparseable(reason: &str) -> WfsError {
    WfsError::Parse(format!("unable to parse schema response: {}", reason))
}
