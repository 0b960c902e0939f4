//! Field targets and radio groups
//!
//! Radios are validated as a group. The group's error state lives on its
//! `fieldset[role=radiogroup]` (aria-invalid, description) and on the first
//! radio in tree order (custom validity). Radios outside such a fieldset are
//! not validation targets.

use fos_a11y::AriaRole;
use fos_dom::{Document, ElementData, NodeId};

use crate::field;

/// The accessible group of a radio field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioTarget {
    pub fieldset: NodeId,
    pub first_radio: NodeId,
}

/// Where a field's error state is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTarget {
    Control(NodeId),
    RadioGroup(RadioTarget),
}

impl FieldTarget {
    /// Carries `aria-invalid`, `aria-busy` and `aria-describedby`
    pub fn anchor(&self) -> NodeId {
        match self {
            Self::Control(node) => *node,
            Self::RadioGroup(group) => group.fieldset,
        }
    }

    /// Carries the custom validity message and receives focus
    pub fn control(&self) -> NodeId {
        match self {
            Self::Control(node) => *node,
            Self::RadioGroup(group) => group.first_radio,
        }
    }

    pub fn is_radio_group(&self) -> bool {
        matches!(self, Self::RadioGroup(_))
    }
}

fn is_radiogroup(elem: &ElementData) -> bool {
    elem.is("fieldset")
        && elem.get_attr("role")
            .and_then(|role| role.split_whitespace().find_map(AriaRole::parse))
            == Some(AriaRole::RadioGroup)
}

/// Group of `radio`, if it sits in an accessible radiogroup fieldset
pub fn radio_target(doc: &Document, radio: NodeId) -> Option<RadioTarget> {
    let fieldset = doc.closest(radio, is_radiogroup)?;
    let first_radio = doc.radio_group(radio)
        .into_iter()
        .find(|&member| doc.tree().is_inclusive_ancestor(fieldset, member))?;
    Some(RadioTarget { fieldset, first_radio })
}

/// Target of the field `name` in `form`.
///
/// `None` for unknown or unnamed fields and for radios outside a radiogroup.
pub fn resolve_target(doc: &Document, form: NodeId, name: &str) -> Option<FieldTarget> {
    let Some(node) = field::find_field(doc, form, name) else {
        tracing::trace!(name, "no such field in the observed form");
        return None;
    };
    if !doc.is_radio(node) {
        return Some(FieldTarget::Control(node));
    }
    match radio_target(doc, node) {
        Some(group) => Some(FieldTarget::RadioGroup(group)),
        None => {
            tracing::debug!(name, "radio is not inside fieldset[role=radiogroup]; ignoring");
            None
        }
    }
}
