//! Accessible descriptions
//!
//! Resolution of `aria-describedby` references.

use fos_dom::{Document, NodeId};

use crate::aria::AriaState;

/// IDs listed in `aria-describedby`, in order
pub fn described_by(doc: &Document, node: NodeId) -> Vec<&str> {
    doc.get_attribute(node, AriaState::DESCRIBED_BY)
        .map(|ids| ids.split_whitespace().collect())
        .unwrap_or_default()
}

/// The element a description is written into: the first `aria-describedby`
/// reference that resolves in the document.
pub fn description_target(doc: &Document, node: NodeId) -> Option<NodeId> {
    let target = described_by(doc, node)
        .into_iter()
        .find_map(|id| doc.get_element_by_id(id));
    if target.is_none() && doc.has_attribute(node, AriaState::DESCRIBED_BY) {
        tracing::trace!(?node, "aria-describedby does not resolve");
    }
    target
}

/// Accessible description: text of every resolvable reference, space-joined
pub fn accessible_description(doc: &Document, node: NodeId) -> String {
    described_by(doc, node)
        .into_iter()
        .filter_map(|id| doc.get_element_by_id(id))
        .map(|target| doc.text_content(target).split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
