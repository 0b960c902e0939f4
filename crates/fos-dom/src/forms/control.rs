//! Form control state and the constraint validation oracle
//!
//! Values and checkedness live on the element (`ControlState`); validity is
//! always computed from the current state, never cached.

use super::input::InputType;
use super::validation::{self, Step, ValidationConstraints, ValidityState};
use crate::{Document, NodeId};

/// Live state of a form control
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    /// Value set by the user or a script (overrides the `value` attribute)
    pub dirty_value: Option<String>,
    /// Checkedness set by the user or a script (overrides `checked`)
    pub dirty_checked: Option<bool>,
    /// Message from `setCustomValidity`
    pub custom_validity: String,
}

impl Document {
    /// Input type of an `<input>`, `None` for other elements
    pub fn input_type(&self, id: NodeId) -> Option<InputType> {
        let elem = self.element(id)?;
        if !elem.is("input") {
            return None;
        }
        Some(InputType::parse(elem.get_attr("type").unwrap_or_default()))
    }

    pub fn is_radio(&self, id: NodeId) -> bool {
        self.input_type(id) == Some(InputType::Radio)
    }

    /// Non-empty `name` attribute
    pub fn field_name(&self, id: NodeId) -> Option<&str> {
        self.get_attribute(id, "name").filter(|n| !n.is_empty())
    }

    /// Current value of a control
    pub fn value(&self, id: NodeId) -> String {
        let Some(elem) = self.element(id) else {
            return String::new();
        };
        if let Some(value) = &elem.control.dirty_value {
            return value.clone();
        }
        match elem.tag.as_str() {
            "textarea" => self.text_content(id),
            "select" => self.selected_option(id)
                .map(|opt| self.option_value(opt))
                .unwrap_or_default(),
            "input" if self.input_type(id).is_some_and(|t| t.is_checkable()) => {
                elem.get_attr("value").unwrap_or("on").to_string()
            }
            _ => elem.get_attr("value").unwrap_or_default().to_string(),
        }
    }

    /// Set the value as a user would
    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if let Some(elem) = self.element_mut(id) {
            elem.control.dirty_value = Some(value.to_string());
        }
    }

    /// Checkedness of a checkbox or radio
    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| {
            e.control.dirty_checked.unwrap_or_else(|| e.attrs.contains("checked"))
        })
    }

    /// Check or uncheck; checking a radio unchecks the rest of its group
    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if checked && self.is_radio(id) {
            for other in self.radio_group(id) {
                if other != id {
                    if let Some(elem) = self.element_mut(other) {
                        elem.control.dirty_checked = Some(false);
                    }
                }
            }
        }
        if let Some(elem) = self.element_mut(id) {
            elem.control.dirty_checked = Some(checked);
        }
    }

    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options: Vec<NodeId> = self.tree.descendants(select)
            .into_iter()
            .filter(|&n| self.is_element(n, "option"))
            .collect();
        options.iter().copied()
            .find(|&o| self.has_attribute(o, "selected"))
            .or_else(|| options.first().copied())
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.get_attribute(option, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(option).trim().to_string(),
        }
    }

    // ---- form association --------------------------------------------

    /// The form owner: the `form` attribute target, else the nearest form ancestor
    pub fn form_owner(&self, id: NodeId) -> Option<NodeId> {
        let elem = self.element(id)?;
        if let Some(form_id) = elem.get_attr("form") {
            return self.get_element_by_id(form_id).filter(|&f| self.is_element(f, "form"));
        }
        self.tree.ancestors(id).find(|&a| self.is_element(a, "form"))
    }

    /// Listed elements owned by `form`, in tree order
    pub fn listed_elements(&self, form: NodeId) -> Vec<NodeId> {
        self.tree_order()
            .into_iter()
            .filter(|&n| self.tag_name(n).is_some_and(super::is_listed))
            .filter(|&n| self.form_owner(n) == Some(form))
            .collect()
    }

    /// Radios sharing `radio`'s name and form owner, in tree order
    pub fn radio_group(&self, radio: NodeId) -> Vec<NodeId> {
        let Some(name) = self.field_name(radio) else {
            return vec![radio];
        };
        let owner = self.form_owner(radio);
        self.tree_order()
            .into_iter()
            .filter(|&n| self.is_radio(n) && self.field_name(n) == Some(name))
            .filter(|&n| self.form_owner(n) == owner)
            .collect()
    }

    // ---- constraint validation -----------------------------------------

    /// Disabled directly or through a disabled fieldset ancestor
    pub fn is_disabled(&self, id: NodeId) -> bool {
        if self.has_attribute(id, "disabled") {
            return true;
        }
        self.tree.ancestors(id).any(|a| {
            self.is_element(a, "fieldset") && self.has_attribute(a, "disabled")
        })
    }

    /// Whether the element is a candidate for constraint validation
    pub fn will_validate(&self, id: NodeId) -> bool {
        let Some(elem) = self.element(id) else {
            return false;
        };
        if self.is_disabled(id) {
            return false;
        }
        if self.tree.ancestors(id).any(|a| self.is_element(a, "datalist")) {
            return false;
        }
        match elem.tag.as_str() {
            "input" => {
                let kind = self.input_type(id).unwrap_or_default();
                kind.participates_in_validation()
                    && !(kind.supports_readonly() && elem.attrs.contains("readonly"))
            }
            "textarea" => !elem.attrs.contains("readonly"),
            "select" => true,
            "button" => {
                let kind = elem.get_attr("type").unwrap_or("submit");
                kind.eq_ignore_ascii_case("submit")
            }
            _ => false,
        }
    }

    pub fn custom_validity(&self, id: NodeId) -> &str {
        self.element(id).map_or("", |e| e.control.custom_validity.as_str())
    }

    /// `setCustomValidity`
    pub fn set_custom_validity(&mut self, id: NodeId, message: &str) {
        if let Some(elem) = self.element_mut(id) {
            if elem.control.custom_validity != message {
                elem.control.custom_validity = message.to_string();
            }
        }
    }

    /// Current validity flags of a control
    pub fn validity(&self, id: NodeId) -> ValidityState {
        let mut state = ValidityState::default();
        if !self.will_validate(id) {
            return state;
        }
        state.custom_error = !self.custom_validity(id).is_empty();

        let required = self.has_attribute(id, "required");
        let value = self.value(id);
        let constraints = self.constraints(id);

        match self.tag_name(id).unwrap_or_default() {
            "textarea" => {
                state.value_missing = required && value.is_empty();
                state.merge(constraints.check_length(&value));
            }
            "select" => {
                state.value_missing = required && value.is_empty();
            }
            "input" => {
                let kind = self.input_type(id).unwrap_or_default();
                state.merge(self.input_validity(id, kind, required, &value, &constraints));
            }
            _ => {}
        }
        state
    }

    fn input_validity(
        &self,
        id: NodeId,
        kind: InputType,
        required: bool,
        value: &str,
        constraints: &ValidationConstraints,
    ) -> ValidityState {
        let mut state = ValidityState::default();
        let multiple = self.has_attribute(id, "multiple");
        // A radio group is required if any member is
        let required = match kind {
            InputType::Radio => self.radio_group(id).iter().any(|&r| self.has_attribute(r, "required")),
            _ => required,
        };

        if required && kind.supports_required() {
            state.value_missing = match kind {
                InputType::Checkbox => !self.checked(id),
                InputType::Radio => !self.radio_group(id).iter().any(|&r| self.checked(r)),
                InputType::Email if multiple => value.trim().is_empty(),
                _ => value.is_empty(),
            };
        }

        if value.is_empty() || kind.is_checkable() {
            return state;
        }

        match kind {
            InputType::Email => {
                state.type_mismatch = if multiple {
                    !validation::is_valid_email_list(value)
                } else {
                    !validation::is_valid_email(value)
                };
            }
            InputType::Url => state.type_mismatch = !validation::is_valid_url(value),
            InputType::Number | InputType::Range => {
                state.merge(constraints.check_number(value));
            }
            _ => {}
        }

        if kind.is_text_like() {
            state.merge(constraints.check_length(value));
            if kind == InputType::Email && multiple {
                for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    state.merge(constraints.check_pattern(part));
                }
            } else {
                state.merge(constraints.check_pattern(value));
            }
        }
        state
    }

    fn constraints(&self, id: NodeId) -> ValidationConstraints {
        let length = |name| {
            self.get_attribute(id, name).and_then(|raw| raw.trim().parse::<usize>().ok())
        };
        let number = |name| self.get_attribute(id, name).and_then(validation::parse_number);
        ValidationConstraints {
            min_length: length("minlength"),
            max_length: length("maxlength"),
            pattern: self.get_attribute(id, "pattern")
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            min: number("min"),
            max: number("max"),
            step: Step::parse(self.get_attribute(id, "step"), 1.0),
        }
    }

    pub fn check_validity(&self, id: NodeId) -> bool {
        self.validity(id).valid()
    }

    /// `validationMessage`: the custom message, else the user agent's text
    pub fn validation_message(&self, id: NodeId) -> String {
        if !self.will_validate(id) {
            return String::new();
        }
        let custom = self.custom_validity(id);
        if !custom.is_empty() {
            return custom.to_string();
        }

        let state = self.validity(id);
        let kind = self.input_type(id);
        let attr = |name| self.get_attribute(id, name).unwrap_or_default().trim().to_string();

        if state.value_missing {
            return match (self.tag_name(id), kind) {
                (_, Some(InputType::Checkbox)) => {
                    "Please check this box if you want to proceed.".to_string()
                }
                (_, Some(InputType::Radio)) => "Please select one of these options.".to_string(),
                (Some("select"), _) => "Please select an item in the list.".to_string(),
                _ => "Please fill out this field.".to_string(),
            };
        }
        if state.bad_input {
            return "Please enter a number.".to_string();
        }
        if state.type_mismatch {
            return match kind {
                Some(InputType::Email) => "Please enter an email address.".to_string(),
                Some(InputType::Url) => "Please enter a URL.".to_string(),
                _ => "Please enter a valid value.".to_string(),
            };
        }
        if state.pattern_mismatch {
            return "Please match the requested format.".to_string();
        }
        if state.too_long {
            return format!("Please shorten this text to {} characters or less.", attr("maxlength"));
        }
        if state.too_short {
            return format!("Please lengthen this text to {} characters or more.", attr("minlength"));
        }
        if state.range_underflow {
            return format!("Value must be greater than or equal to {}.", attr("min"));
        }
        if state.range_overflow {
            return format!("Value must be less than or equal to {}.", attr("max"));
        }
        if state.step_mismatch {
            return "Please enter a valid value.".to_string();
        }
        String::new()
    }

    /// `reportValidity`: on failure focus the control and show its bubble
    pub fn report_validity(&mut self, id: NodeId) -> bool {
        if self.check_validity(id) {
            return true;
        }
        let message = self.validation_message(id);
        tracing::debug!(?id, %message, "reporting invalid control");
        self.focus(id);
        self.scroll_into_view(id);
        self.reported = Some((id, message));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(inputs: &[&[(&str, &str)]]) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::default();
        let form = doc.create_element("form");
        doc.append_child(doc.body(), form).unwrap();
        let ids = inputs.iter().map(|attrs| {
            let input = doc.create_element("input");
            for (name, value) in attrs.iter() {
                doc.set_attribute(input, name, value);
            }
            doc.append_child(form, input).unwrap();
            input
        }).collect();
        (doc, form, ids)
    }

    #[test]
    fn test_required_text() {
        let (mut doc, _, ids) = form_with(&[&[("name", "first"), ("required", "")]]);
        let input = ids[0];

        assert!(doc.validity(input).value_missing);
        assert_eq!(doc.validation_message(input), "Please fill out this field.");

        doc.set_value(input, "Ada");
        assert!(doc.check_validity(input));
        assert_eq!(doc.validation_message(input), "");
    }

    #[test]
    fn test_email_type_mismatch() {
        let (mut doc, _, ids) = form_with(&[&[("name", "email"), ("type", "email")]]);
        doc.set_value(ids[0], "bad");
        assert!(doc.validity(ids[0]).type_mismatch);
        assert_eq!(doc.validation_message(ids[0]), "Please enter an email address.");

        doc.set_value(ids[0], "x@y.com");
        assert!(doc.check_validity(ids[0]));
    }

    #[test]
    fn test_required_and_pattern_on_empty_value() {
        let (doc, _, ids) = form_with(&[&[("name", "code"), ("required", ""), ("pattern", "\\d+")]]);
        let state = doc.validity(ids[0]);
        assert!(state.value_missing);
        assert!(!state.pattern_mismatch);
    }

    #[test]
    fn test_custom_validity_masks_native_message() {
        let (mut doc, _, ids) = form_with(&[&[("name", "a"), ("required", "")]]);
        doc.set_custom_validity(ids[0], "Custom");
        assert_eq!(doc.validation_message(ids[0]), "Custom");
        assert!(doc.validity(ids[0]).custom_error);

        doc.set_custom_validity(ids[0], "");
        assert_eq!(doc.validation_message(ids[0]), "Please fill out this field.");
    }

    #[test]
    fn test_radio_group_value_missing() {
        let (mut doc, form, ids) = form_with(&[
            &[("type", "radio"), ("name", "choice"), ("value", "a"), ("required", "")],
            &[("type", "radio"), ("name", "choice"), ("value", "b")],
        ]);
        assert_eq!(doc.radio_group(ids[1]), ids);
        assert!(doc.validity(ids[0]).value_missing);
        assert!(doc.validity(ids[1]).value_missing);

        doc.set_checked(ids[1], true);
        assert!(doc.check_validity(ids[0]));
        assert_eq!(doc.listed_elements(form), ids);

        doc.set_checked(ids[0], true);
        assert!(!doc.checked(ids[1]));
    }

    #[test]
    fn test_disabled_controls_are_barred() {
        let (mut doc, _, ids) = form_with(&[&[("name", "a"), ("required", ""), ("disabled", "")]]);
        assert!(!doc.will_validate(ids[0]));
        assert!(doc.check_validity(ids[0]));
        doc.set_custom_validity(ids[0], "ignored");
        assert_eq!(doc.validation_message(ids[0]), "");
    }

    #[test]
    fn test_form_attribute_association() {
        let (mut doc, form, _) = form_with(&[]);
        doc.set_attribute(form, "id", "signup");
        let outside = doc.create_element("input");
        doc.set_attribute(outside, "form", "signup");
        doc.append_child(doc.body(), outside).unwrap();

        assert_eq!(doc.form_owner(outside), Some(form));
        assert_eq!(doc.listed_elements(form), vec![outside]);
    }

    #[test]
    fn test_report_validity_records_bubble() {
        let (mut doc, _, ids) = form_with(&[&[("name", "a"), ("required", "")]]);
        assert!(!doc.report_validity(ids[0]));
        assert_eq!(doc.reported_validity(), Some((ids[0], "Please fill out this field.")));
        assert_eq!(doc.active_element(), Some(ids[0]));
    }

    #[test]
    fn test_number_bad_input_message() {
        let (mut doc, _, ids) = form_with(&[&[("name", "age"), ("type", "number"), ("min", "18")]]);
        doc.set_value(ids[0], "abc");
        assert_eq!(doc.validation_message(ids[0]), "Please enter a number.");
        doc.set_value(ids[0], "12");
        assert_eq!(doc.validation_message(ids[0]), "Value must be greater than or equal to 18.");
    }
}
