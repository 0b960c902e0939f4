//! fOS Accessibility
//!
//! Accessibility APIs for the fOS browser engine.
//!
//! Features:
//! - ARIA roles and the states form controls expose
//! - `aria-describedby` resolution and accessible descriptions

pub mod aria;
pub mod description;

pub use aria::{AriaRole, AriaState, role_of, set_state, is_invalid, is_busy};
pub use description::{accessible_description, described_by, description_target};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Invalid ARIA role: {0}")]
    InvalidRole(String),
}
