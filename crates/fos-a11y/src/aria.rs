//! ARIA Support
//!
//! Roles and the states form validation writes to the accessibility tree.

use std::str::FromStr;

use fos_dom::{Document, InputType, NodeId};

use crate::A11yError;

/// ARIA role (the subset relevant to form controls and their containers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Alert,
    Button,
    Checkbox,
    Combobox,
    Form,
    Group,
    ListBox,
    Radio,
    RadioGroup,
    SearchBox,
    Slider,
    SpinButton,
    Status,
    Switch,
    TextBox,
    Presentation,
}

impl AriaRole {
    /// Parse a single role token
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "alert" => Self::Alert,
            "button" => Self::Button,
            "checkbox" => Self::Checkbox,
            "combobox" => Self::Combobox,
            "form" => Self::Form,
            "group" => Self::Group,
            "listbox" => Self::ListBox,
            "radio" => Self::Radio,
            "radiogroup" => Self::RadioGroup,
            "searchbox" => Self::SearchBox,
            "slider" => Self::Slider,
            "spinbutton" => Self::SpinButton,
            "status" => Self::Status,
            "switch" => Self::Switch,
            "textbox" => Self::TextBox,
            "none" | "presentation" => Self::Presentation,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Combobox => "combobox",
            Self::Form => "form",
            Self::Group => "group",
            Self::ListBox => "listbox",
            Self::Radio => "radio",
            Self::RadioGroup => "radiogroup",
            Self::SearchBox => "searchbox",
            Self::Slider => "slider",
            Self::SpinButton => "spinbutton",
            Self::Status => "status",
            Self::Switch => "switch",
            Self::TextBox => "textbox",
            Self::Presentation => "presentation",
        }
    }

    /// Roles a user can type into or pick from
    pub fn is_widget(&self) -> bool {
        !matches!(self, Self::Alert | Self::Form | Self::Group | Self::RadioGroup |
                        Self::Status | Self::Presentation)
    }
}

impl FromStr for AriaRole {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| A11yError::InvalidRole(s.to_string()))
    }
}

/// Effective role of an element: the first recognised token of `role`,
/// else the implicit role of its tag.
pub fn role_of(doc: &Document, node: NodeId) -> Option<AriaRole> {
    let elem = doc.element(node)?;
    if let Some(explicit) = elem.get_attr("role")
        .and_then(|r| r.split_whitespace().find_map(AriaRole::parse))
    {
        return Some(explicit);
    }

    Some(match elem.tag.as_str() {
        "form" => AriaRole::Form,
        "fieldset" => AriaRole::Group,
        "button" => AriaRole::Button,
        "textarea" => AriaRole::TextBox,
        "select" if elem.attrs.contains("multiple") => AriaRole::ListBox,
        "select" => AriaRole::Combobox,
        "output" => AriaRole::Status,
        "input" => match doc.input_type(node).unwrap_or_default() {
            InputType::Radio => AriaRole::Radio,
            InputType::Checkbox => AriaRole::Checkbox,
            InputType::Number => AriaRole::SpinButton,
            InputType::Range => AriaRole::Slider,
            InputType::Search => AriaRole::SearchBox,
            kind if kind.is_button() => AriaRole::Button,
            _ => AriaRole::TextBox,
        },
        _ => return None,
    })
}

/// ARIA state values parsed from attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaState {
    Invalid(bool),
    Busy(bool),
}

impl AriaState {
    pub const INVALID: &'static str = "aria-invalid";
    pub const BUSY: &'static str = "aria-busy";
    pub const DESCRIBED_BY: &'static str = "aria-describedby";

    /// Attribute name for this state
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Invalid(_) => Self::INVALID,
            Self::Busy(_) => Self::BUSY,
        }
    }

    /// Attribute value for this state
    pub fn value(&self) -> &'static str {
        match self {
            Self::Invalid(true) | Self::Busy(true) => "true",
            Self::Invalid(false) | Self::Busy(false) => "false",
        }
    }
}

/// Write a state. Returns whether the attribute changed.
pub fn set_state(doc: &mut Document, node: NodeId, state: AriaState) -> bool {
    doc.set_attribute(node, state.attribute(), state.value())
}

/// `aria-invalid` as a boolean; any value other than "false" and "" counts as invalid
pub fn is_invalid(doc: &Document, node: NodeId) -> bool {
    doc.get_attribute(node, AriaState::INVALID)
        .is_some_and(|v| !v.is_empty() && !v.eq_ignore_ascii_case("false"))
}

pub fn is_busy(doc: &Document, node: NodeId) -> bool {
    doc.get_attribute(node, AriaState::BUSY).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
