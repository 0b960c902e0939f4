//! Native constraints an error message can be configured for

use std::fmt;

use fos_dom::ValidityState;
use serde::{Deserialize, Serialize};

/// A native constraint, ordered by resolution priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
    BadInput,
    Required,
    MinLength,
    Min,
    MaxLength,
    Max,
    Step,
    Type,
    Pattern,
}

impl Constraint {
    /// Resolution order: the first flagged constraint wins
    pub const PRIORITY: [Constraint; 9] = [
        Self::BadInput,
        Self::Required,
        Self::MinLength,
        Self::Min,
        Self::MaxLength,
        Self::Max,
        Self::Step,
        Self::Type,
        Self::Pattern,
    ];

    /// Whether `validity` reports this constraint as broken
    pub fn is_flagged(self, validity: &ValidityState) -> bool {
        match self {
            Self::BadInput => validity.bad_input,
            Self::Required => validity.value_missing,
            Self::MinLength => validity.too_short,
            Self::Min => validity.range_underflow,
            Self::MaxLength => validity.too_long,
            Self::Max => validity.range_overflow,
            Self::Step => validity.step_mismatch,
            Self::Type => validity.type_mismatch,
            Self::Pattern => validity.pattern_mismatch,
        }
    }

    /// Highest-priority broken constraint
    pub fn first_flagged(validity: &ValidityState) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|c| c.is_flagged(validity))
    }

    /// Attribute-style name (`minlength`, `badinput`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadInput => "badinput",
            Self::Required => "required",
            Self::MinLength => "minlength",
            Self::Min => "min",
            Self::MaxLength => "maxlength",
            Self::Max => "max",
            Self::Step => "step",
            Self::Type => "type",
            Self::Pattern => "pattern",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_beats_pattern() {
        let validity = ValidityState {
            value_missing: true,
            pattern_mismatch: true,
            ..Default::default()
        };
        assert_eq!(Constraint::first_flagged(&validity), Some(Constraint::Required));
    }

    #[test]
    fn test_bad_input_beats_everything() {
        let validity = ValidityState {
            bad_input: true,
            value_missing: true,
            ..Default::default()
        };
        assert_eq!(Constraint::first_flagged(&validity), Some(Constraint::BadInput));
    }

    #[test]
    fn test_custom_error_is_not_a_constraint() {
        let validity = ValidityState { custom_error: true, ..Default::default() };
        assert_eq!(Constraint::first_flagged(&validity), None);
    }

    #[test]
    fn test_priority_matches_ordering() {
        let mut sorted = Constraint::PRIORITY;
        sorted.sort();
        assert_eq!(sorted, Constraint::PRIORITY);
    }

    #[test]
    fn test_serde_names() {
        let parsed: Constraint = serde_json::from_str("\"minlength\"").unwrap();
        assert_eq!(parsed, Constraint::MinLength);
        assert_eq!(serde_json::to_string(&Constraint::BadInput).unwrap(), "\"badinput\"");
    }
}
