//! Form Elements Module
//!
//! Live state and constraint validation for HTML form controls:
//! input, textarea, select, button, fieldset, output, object.

mod control;
mod input;
mod validation;

pub use control::ControlState;
pub use input::InputType;
pub use validation::ValidityState;

/// Tags of "listed" form-associated elements, in the HTML sense
pub const LISTED_ELEMENTS: &[&str] = &[
    "button", "fieldset", "input", "object", "output", "select", "textarea",
];

/// Whether a tag names a listed form-associated element
pub fn is_listed(tag: &str) -> bool {
    LISTED_ELEMENTS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_elements() {
        assert!(is_listed("input"));
        assert!(is_listed("FIELDSET"));
        assert!(!is_listed("form"));
        assert!(!is_listed("label"));
    }
}
