//! Form Validation
//!
//! Constraint Validation API: the `ValidityState` flags and the pure checks
//! that produce them.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;

/// Validity state for form controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    /// The element's value is missing (for required)
    pub value_missing: bool,
    /// The element's value is too short
    pub too_short: bool,
    /// The element's value is below the minimum
    pub range_underflow: bool,
    /// The element's value is too long
    pub too_long: bool,
    /// The element's value is above the maximum
    pub range_overflow: bool,
    /// The element's value doesn't match step
    pub step_mismatch: bool,
    /// The element's value doesn't match the type
    pub type_mismatch: bool,
    /// The element's value doesn't match the pattern
    pub pattern_mismatch: bool,
    /// The user agent cannot convert the input
    pub bad_input: bool,
    /// Custom validity message set
    pub custom_error: bool,
}

impl ValidityState {
    /// Check if the element satisfies every constraint
    pub fn valid(&self) -> bool {
        self.native_valid() && !self.custom_error
    }

    /// Check native constraints only, ignoring any custom error
    pub fn native_valid(&self) -> bool {
        !self.value_missing &&
        !self.too_short &&
        !self.range_underflow &&
        !self.too_long &&
        !self.range_overflow &&
        !self.step_mismatch &&
        !self.type_mismatch &&
        !self.pattern_mismatch &&
        !self.bad_input
    }

    /// Merge flags from another check
    pub fn merge(&mut self, other: ValidityState) {
        self.value_missing |= other.value_missing;
        self.too_short |= other.too_short;
        self.range_underflow |= other.range_underflow;
        self.too_long |= other.too_long;
        self.range_overflow |= other.range_overflow;
        self.step_mismatch |= other.step_mismatch;
        self.type_mismatch |= other.type_mismatch;
        self.pattern_mismatch |= other.pattern_mismatch;
        self.bad_input |= other.bad_input;
        self.custom_error |= other.custom_error;
    }
}

/// Step constraint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// `step="any"`
    Any,
    Value(f64),
}

impl Step {
    /// Parse the `step` attribute; invalid or non-positive values use `default`
    pub fn parse(raw: Option<&str>, default: f64) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("any") => Self::Any,
            Some(s) => match parse_number(s) {
                Some(step) if step > 0.0 => Self::Value(step),
                _ => Self::Value(default),
            },
            None => Self::Value(default),
        }
    }
}

/// Validation constraints read from a control's attributes
#[derive(Debug, Clone)]
pub struct ValidationConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Step,
}

impl Default for ValidationConstraints {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            pattern: None,
            min: None,
            max: None,
            step: Step::Value(1.0),
        }
    }
}

impl ValidationConstraints {
    /// Length constraints for a non-empty value
    pub fn check_length(&self, value: &str) -> ValidityState {
        let mut state = ValidityState::default();
        if value.is_empty() {
            return state;
        }
        let len = value.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                state.too_short = true;
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                state.too_long = true;
            }
        }
        state
    }

    /// `pattern` constraint for a non-empty value
    pub fn check_pattern(&self, value: &str) -> ValidityState {
        let mut state = ValidityState::default();
        if let Some(pattern) = self.pattern.as_deref() {
            if !value.is_empty() && !pattern_matches(pattern, value) {
                state.pattern_mismatch = true;
            }
        }
        state
    }

    /// Numeric constraints for a number/range value
    pub fn check_number(&self, value: &str) -> ValidityState {
        let mut state = ValidityState::default();
        if value.is_empty() {
            return state;
        }
        let Some(number) = parse_number(value) else {
            state.bad_input = true;
            return state;
        };

        if let Some(min) = self.min {
            if number < min {
                state.range_underflow = true;
            }
        }
        if let Some(max) = self.max {
            if number > max {
                state.range_overflow = true;
            }
        }
        if let Step::Value(step) = self.step {
            let base = self.min.unwrap_or(0.0);
            let quotient = (number - base) / step;
            if (quotient - quotient.round()).abs() > 1e-9 {
                state.step_mismatch = true;
            }
        }
        state
    }
}

/// Parse a valid floating-point number; non-finite values are rejected
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.starts_with('+') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The HTML "valid email address" grammar
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email grammar is a valid regex")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Comma-separated list for `<input type=email multiple>`
pub fn is_valid_email_list(value: &str) -> bool {
    value.split(',').map(str::trim).all(|part| !part.is_empty() && is_valid_email(part))
}

/// Absolute URL check for `<input type=url>`
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value.trim()).is_ok()
}

/// Compiled `pattern` attributes; `None` marks a pattern that failed to compile
static PATTERNS: LazyLock<Mutex<HashMap<String, Option<Regex>>>> = LazyLock::new(Default::default);

fn compiled_pattern(pattern: &str) -> Option<Regex> {
    let mut cache = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(compiled) = cache.get(pattern) {
        return compiled.clone();
    }
    let compiled = match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::debug!(pattern, %err, "ignoring invalid pattern attribute");
            None
        }
    };
    cache.insert(pattern.to_string(), compiled.clone());
    compiled
}

/// Whether `value` matches the whole `pattern`.
///
/// A pattern that fails to compile never produces a mismatch.
pub fn pattern_matches(pattern: &str, value: &str) -> bool {
    compiled_pattern(pattern).is_none_or(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_state_valid() {
        let state = ValidityState::default();
        assert!(state.valid());
    }

    #[test]
    fn test_custom_error_only_affects_valid() {
        let state = ValidityState {
            custom_error: true,
            ..Default::default()
        };
        assert!(!state.valid());
        assert!(state.native_valid());
    }

    #[test]
    fn test_length_validation() {
        let constraints = ValidationConstraints {
            min_length: Some(3),
            max_length: Some(5),
            ..Default::default()
        };

        assert!(constraints.check_length("").valid());
        assert!(constraints.check_length("ab").too_short);
        assert!(constraints.check_length("abcdef").too_long);
        assert!(constraints.check_length("abcd").valid());
    }

    #[test]
    fn test_number_validation() {
        let constraints = ValidationConstraints {
            min: Some(0.0),
            max: Some(100.0),
            step: Step::Value(5.0),
            ..Default::default()
        };

        assert!(constraints.check_number("-5").range_underflow);
        assert!(constraints.check_number("105").range_overflow);
        assert!(constraints.check_number("52").step_mismatch);
        assert!(constraints.check_number("50").valid());
        assert!(constraints.check_number("abc").bad_input);
    }

    #[test]
    fn test_step_any_and_fractions() {
        let any = ValidationConstraints { step: Step::Any, ..Default::default() };
        assert!(any.check_number("1.25").valid());

        let tenths = ValidationConstraints { step: Step::Value(0.1), ..Default::default() };
        assert!(tenths.check_number("0.3").valid());
    }

    #[test]
    fn test_step_parse() {
        assert_eq!(Step::parse(Some("any"), 1.0), Step::Any);
        assert_eq!(Step::parse(Some("0.5"), 1.0), Step::Value(0.5));
        assert_eq!(Step::parse(Some("-2"), 1.0), Step::Value(1.0));
        assert_eq!(Step::parse(None, 1.0), Step::Value(1.0));
    }

    #[test]
    fn test_email_grammar() {
        assert!(is_valid_email("x@y.com"));
        assert!(is_valid_email("user@localhost"));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("a@-b.com"));
        assert!(is_valid_email_list("a@b.c, d@e.f"));
        assert!(!is_valid_email_list("a@b.c,,d@e.f"));
    }

    #[test]
    fn test_url_check() {
        assert!(is_valid_url("https://example.com/path"));
        assert!(!is_valid_url("example"));
    }

    #[test]
    fn test_pattern_is_anchored() {
        assert!(pattern_matches("[a-z]+", "abc"));
        assert!(!pattern_matches("[a-z]+", "abc1"));
        assert!(pattern_matches("a|b", "b"));
        assert!(pattern_matches("(", "anything"));
    }

    #[test]
    fn test_pattern_compiled_once() {
        assert!(pattern_matches("[0-9]{3}", "123"));
        let first = compiled_pattern("[0-9]{3}").unwrap();
        let second = compiled_pattern("[0-9]{3}").unwrap();
        assert_eq!(first.as_str(), "^(?:[0-9]{3})$");
        assert_eq!(first.as_str(), second.as_str());
        assert!(PATTERNS.lock().unwrap().contains_key("[0-9]{3}"));
        assert!(compiled_pattern("(").is_none());
    }
}
