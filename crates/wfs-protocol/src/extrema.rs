//! Value extraction for sorted single-record extrema queries.

use wfs_common::{WfsError, WfsResult};

use crate::xml::Document;

/// Pull the value of `field` out of a GetFeature response.
///
/// Every element named `field` is considered, whatever its container; only
/// those written with the `workspace` prefix qualify. When several qualify
/// the last one in document order is returned.
pub fn extract_extremum(xml: &str, field: &str, workspace: &str) -> WfsResult<String> {
    let doc = Document::parse(xml)?;

    let nodes = doc.elements_by_local_name(field);
    if nodes.is_empty() {
        return Err(WfsError::FieldNotFound(field.to_string()));
    }

    nodes
        .iter()
        .rev()
        .find(|node| node.prefix() == Some(workspace))
        .map(|node| node.text_content())
        .ok_or_else(|| WfsError::PrefixMismatch {
            field: field.to_string(),
            workspace: workspace.to_string(),
        })
}
