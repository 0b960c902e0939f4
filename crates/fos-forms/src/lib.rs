//! fOS Forms - Form Validity Observer
//!
//! Keeps a form's fields, their native validity and the accessibility tree
//! in agreement:
//!
//! - per-field error messages for each native constraint, static, computed
//!   from the field, or painted as rich content by a renderer
//! - custom synchronous and asynchronous validators
//! - radio groups handled as one field through `fieldset[role=radiogroup]`
//! - bulk validation that waits for every field before reporting, then
//!   focuses the first failure
//!
//! ```no_run
//! use fos_forms::{ErrorConfig, FormValidityObserver, ValidateOptions, ValidatorOptions};
//!
//! let doc = fos_html::parse(r#"<form id="signup"><input name="email" type="email" required></form>"#)
//!     .unwrap()
//!     .into_shared();
//! let form = doc.borrow().get_element_by_id("signup").unwrap();
//!
//! let observer = FormValidityObserver::new(doc.clone(), ValidatorOptions::new().on(["focusout"]));
//! observer.observe(form).unwrap();
//! observer.configure("email", ErrorConfig::new().type_mismatch("Bad format"));
//!
//! let valid = smol::block_on(
//!     observer.validate_fields(None, ValidateOptions::focused()).unwrap().settle(),
//! );
//! ```

mod config;
mod constraint;
mod error;
mod field;
mod message;
mod options;
mod outcome;
mod radio;
mod render;
mod resolver;
mod store;
mod table;
mod validator;

pub use config::{ErrorConfig, ErrorDescriptor, Failure, MessageFn, Rejection, RenderableMessage, ValidateFn, Verdict};
pub use constraint::Constraint;
pub use error::FormError;
pub use field::FieldView;
pub use message::{ErrorMessage, RichContent, Segment};
pub use options::{ValidateOptions, ValidatorOptions};
pub use outcome::{Validation, ValidationOutcome};
pub use radio::{FieldTarget, RadioTarget, radio_target, resolve_target};
pub use render::{Renderer, Scroller, default_renderer};
pub use table::{DEFAULTS_KEY, MessageTable};
pub use validator::{FieldPhase, FormValidityObserver};
