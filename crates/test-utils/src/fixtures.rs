//! XML document builders mirroring GeoServer WFS 1.1.0 responses.

pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const GML_NS: &str = "http://www.opengis.net/gml";
pub const WFS_NS: &str = "http://www.opengis.net/wfs";

/// Namespace URI used for a workspace prefix in fixtures.
pub fn workspace_ns(workspace: &str) -> String {
    format!("http://example.org/{}", workspace)
}

/// Escape text for element content and attribute values.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A DescribeFeatureType response declaring `fields` (name, type) in order.
///
/// Laid out the way GeoServer does it: the field sequence sits under
/// `complexContent/extension`, followed by a top-level element declaration
/// for the feature itself, with indentation whitespace between every node.
pub fn describe_feature_type_xml(workspace: &str, name: &str, fields: &[(&str, &str)]) -> String {
    describe_feature_type_xml_named(workspace, name, &format!("{}Type", name), fields)
}

/// Like [`describe_feature_type_xml`] but with an explicit complexType name.
pub fn describe_feature_type_xml_named(
    workspace: &str,
    name: &str,
    complex_type_name: &str,
    fields: &[(&str, &str)],
) -> String {
    let mut elements = String::new();
    for (field, field_type) in fields {
        elements.push_str(&format!(
            "          <xsd:element maxOccurs=\"1\" minOccurs=\"0\" name=\"{}\" nillable=\"true\" type=\"{}\"/>\n",
            escape(field),
            escape(field_type)
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:gml="{gml}" xmlns:{ws}="{ws_ns}" xmlns:xsd="{xsd}" elementFormDefault="qualified" targetNamespace="{ws_ns}">
  <xsd:import namespace="{gml}" schemaLocation="http://localhost:8080/geoserver/schemas/gml/3.1.1/base/gml.xsd"/>
  <xsd:complexType name="{ct}">
    <xsd:complexContent>
      <xsd:extension base="gml:AbstractFeatureType">
        <xsd:sequence>
{elements}        </xsd:sequence>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
  <xsd:element name="{name}" substitutionGroup="gml:_Feature" type="{ws}:{ct}"/>
</xsd:schema>
"#,
        gml = GML_NS,
        xsd = XSD_NS,
        ws = workspace,
        ws_ns = workspace_ns(workspace),
        ct = escape(complex_type_name),
        name = escape(name),
        elements = elements,
    )
}

/// One GML feature member with plain text properties.
pub fn gml_feature(workspace: &str, layer: &str, id: &str, fields: &[(&str, &str)]) -> String {
    gml_feature_with_geometry(workspace, layer, id, fields, None)
}

/// One GML feature member, optionally carrying a polygon geometry under `geometry_field`.
pub fn gml_feature_with_geometry(
    workspace: &str,
    layer: &str,
    id: &str,
    fields: &[(&str, &str)],
    geometry_field: Option<&str>,
) -> String {
    let mut body = String::new();
    for (field, value) in fields {
        body.push_str(&format!(
            "<{ws}:{f}>{v}</{ws}:{f}>",
            ws = workspace,
            f = field,
            v = escape(value)
        ));
    }
    if let Some(geom) = geometry_field {
        body.push_str(&format!(
            "<{ws}:{g}><gml:MultiSurface srsName=\"urn:x-ogc:def:crs:EPSG:4326\"><gml:surfaceMember><gml:Polygon><gml:exterior><gml:LinearRing><gml:posList>0 0 0 1 1 1 0 0</gml:posList></gml:LinearRing></gml:exterior></gml:Polygon></gml:surfaceMember></gml:MultiSurface></{ws}:{g}>",
            ws = workspace,
            g = geom
        ));
    }

    format!(
        "<{ws}:{layer} gml:id=\"{id}\">{body}</{ws}:{layer}>",
        ws = workspace,
        layer = layer,
        id = escape(id),
        body = body
    )
}

/// A GetFeature response wrapping `members` in a single `gml:featureMembers`.
pub fn feature_collection_xml(workspaces: &[&str], members: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><wfs:FeatureCollection numberOfFeatures="{n}" timeStamp="2020-06-01T00:00:00.000Z" {ns} xmlns:wfs="{wfs}" xmlns:gml="{gml}"><gml:featureMembers>{members}</gml:featureMembers></wfs:FeatureCollection>"#,
        n = members.len(),
        ns = namespace_decls(workspaces),
        wfs = WFS_NS,
        gml = GML_NS,
        members = members.concat(),
    )
}

/// A GetFeature response for a query that matched nothing.
pub fn empty_feature_collection_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><wfs:FeatureCollection numberOfFeatures="0" timeStamp="2020-06-01T00:00:00.000Z" xmlns:wfs="{wfs}" xmlns:gml="{gml}"/>"#,
        wfs = WFS_NS,
        gml = GML_NS,
    )
}

fn namespace_decls(workspaces: &[&str]) -> String {
    workspaces
        .iter()
        .map(|ws| format!("xmlns:{}=\"{}\"", ws, workspace_ns(ws)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// End-to-end scenario documents.
pub mod scenarios {
    use super::*;

    pub const WORKSPACE: &str = "ws";
    pub const LAYER: &str = "layer";

    /// Type description declaring `start_time` (xsd:dateTime) and `geom` (gml multipolygon).
    pub fn layer_schema_xml() -> String {
        describe_feature_type_xml(
            WORKSPACE,
            LAYER,
            &[
                ("start_time", "xsd:dateTime"),
                ("geom", "gml:MultiPolygonPropertyType"),
            ],
        )
    }

    /// One feature `layer.1` with a start time and a geometry.
    pub fn single_feature_xml() -> String {
        feature_collection_xml(
            &[WORKSPACE],
            &[gml_feature_with_geometry(
                WORKSPACE,
                LAYER,
                "layer.1",
                &[("start_time", "2020-01-01T00:00:00Z")],
                Some("geom"),
            )],
        )
    }

    /// A collection with an empty featureMembers container.
    pub fn zero_members_xml() -> String {
        feature_collection_xml(&[WORKSPACE], &[])
    }

    /// `ws1:start_time = A` and `ws2:start_time = B` in the same record.
    pub fn mixed_prefix_extrema_xml() -> String {
        feature_collection_xml(
            &["ws1", "ws2"],
            &["<ws2:layer gml:id=\"layer.7\"><ws1:start_time>A</ws1:start_time><ws2:start_time>B</ws2:start_time></ws2:layer>".to_string()],
        )
    }
}
