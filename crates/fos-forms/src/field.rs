//! Field lookup and snapshots
//!
//! A field is the first listed control of the observed form carrying a
//! given `name`. Message functions and custom validators never see the live
//! document; they receive a [`FieldView`] captured just before they run.

use std::collections::HashSet;

use fos_dom::{Document, InputType, NodeId, ValidityState};

/// Listed elements that never take part in validation
const EXCLUDED_TAGS: &[&str] = &["fieldset", "output", "object"];

/// Point-in-time view of a field
#[derive(Debug, Clone)]
pub struct FieldView {
    /// Node the view was taken from (the first radio for a radio group)
    pub node: NodeId,
    pub name: String,
    pub tag: String,
    pub input_type: Option<InputType>,
    /// Current value; for a radio group, the checked radio's value or ""
    pub value: String,
    pub validity: ValidityState,
    /// Native `validationMessage` at capture time
    pub validation_message: String,
    attributes: Vec<(String, String)>,
}

impl FieldView {
    pub(crate) fn capture(doc: &Document, node: NodeId, name: &str) -> Self {
        let input_type = doc.input_type(node);
        let value = if input_type == Some(InputType::Radio) {
            doc.radio_group(node)
                .into_iter()
                .find(|&radio| doc.checked(radio))
                .map(|radio| doc.value(radio))
                .unwrap_or_default()
        } else {
            doc.value(node)
        };
        let attributes = doc.element(node)
            .map(|e| e.attrs.iter().map(|a| (a.name.clone(), a.value.clone())).collect())
            .unwrap_or_default();

        Self {
            node,
            name: name.to_string(),
            tag: doc.tag_name(node).unwrap_or_default().to_string(),
            input_type,
            value,
            validity: doc.validity(node),
            validation_message: doc.validation_message(node),
            attributes,
        }
    }

    /// Attribute value at capture time
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn is_field(doc: &Document, node: NodeId) -> bool {
    doc.tag_name(node).is_some_and(|tag| !EXCLUDED_TAGS.contains(&tag))
}

/// First field of `form` named `name`
pub(crate) fn find_field(doc: &Document, form: NodeId, name: &str) -> Option<NodeId> {
    if name.is_empty() {
        return None;
    }
    doc.listed_elements(form)
        .into_iter()
        .find(|&node| is_field(doc, node) && doc.field_name(node) == Some(name))
}

/// Unique field names of `form` in tree order
pub(crate) fn field_names(doc: &Document, form: NodeId) -> Vec<String> {
    let mut seen = HashSet::new();
    doc.listed_elements(form)
        .into_iter()
        .filter(|&node| is_field(doc, node))
        .filter_map(|node| doc.field_name(node))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
